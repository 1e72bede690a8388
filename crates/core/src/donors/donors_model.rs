//! Donor domain models.

use chrono::NaiveDateTime;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::{errors::ValidationError, Error, Result};

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

/// Normalizes an email address for use as the donor natural key.
///
/// Trims surrounding whitespace and lower-cases the address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Domain model representing a person who has initiated at least one donation.
///
/// Donors are keyed by normalized email. The aggregate fields
/// (`total_donated`, `donation_count`, `is_recurring_donor`) are mutated
/// only by successful payment verifications.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: String,
    /// Natural key, case-normalized.
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Tax identifier (PAN) supplied for receipt purposes.
    pub pan_number: Option<String>,
    /// Lifetime sum of completed donation amounts, in major currency units.
    pub total_donated: Decimal,
    /// Number of completed donations.
    pub donation_count: i64,
    /// True once any non-one-time donation has completed.
    pub is_recurring_donor: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Profile fields captured at order-creation time.
///
/// Used to upsert a donor by email: creates the donor if absent, otherwise
/// overwrites the optional contact fields last-write-wins. Aggregates are
/// never touched through this path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfile {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub pan_number: Option<String>,
}

impl DonorProfile {
    /// Validates the profile and normalizes the email key.
    pub fn validate(&mut self) -> Result<()> {
        self.email = normalize_email(&self.email);
        if self.email.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "donorEmail".to_string(),
            )));
        }
        if !email_regex().is_match(&self.email) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "'{}' is not a valid email address",
                self.email
            ))));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "donorName".to_string(),
            )));
        }
        Ok(())
    }
}
