//! Settings domain models.
//!
//! Runtime configuration is a typed schema, not a dynamic dictionary:
//! every field has a compiled-in default, and stored rows override
//! individual fields. The merge lives in [`Settings::from_overrides`] so
//! storage implementations stay trivial.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::{BASE_CURRENCY, DEFAULT_RECEIPT_PREFIX};
use crate::{errors::ValidationError, Error, Result};

/// Storage keys for settings overrides.
pub mod keys {
    pub const ORGANIZATION_NAME: &str = "organization_name";
    pub const CONTACT_EMAIL: &str = "contact_email";
    pub const CURRENCY: &str = "currency";
    pub const MIN_DONATION_AMOUNT: &str = "min_donation_amount";
    pub const RECEIPT_PREFIX: &str = "receipt_prefix";
    pub const INSTANCE_ID: &str = "instance_id";
}

/// Typed runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub organization_name: String,
    pub contact_email: String,
    /// The deployment currency; donations are single-currency.
    pub currency: String,
    /// Minimum accepted donation amount in major units.
    pub min_donation_amount: Decimal,
    /// Prefix for generated receipt numbers.
    pub receipt_prefix: String,
    /// Stable identifier for this installation, generated on first run.
    pub instance_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organization_name: "Seva Foundation".to_string(),
            contact_email: String::new(),
            currency: BASE_CURRENCY.to_string(),
            min_donation_amount: dec!(1),
            receipt_prefix: DEFAULT_RECEIPT_PREFIX.to_string(),
            instance_id: String::new(),
        }
    }
}

impl Settings {
    /// Merges stored override rows over the compiled-in defaults.
    ///
    /// Unknown keys and unparseable values are ignored in favor of the
    /// default for that field.
    pub fn from_overrides(overrides: &HashMap<String, String>) -> Settings {
        let mut settings = Settings::default();
        for (key, value) in overrides {
            match key.as_str() {
                keys::ORGANIZATION_NAME => settings.organization_name = value.clone(),
                keys::CONTACT_EMAIL => settings.contact_email = value.clone(),
                keys::CURRENCY => settings.currency = value.clone(),
                keys::MIN_DONATION_AMOUNT => {
                    if let Ok(amount) = value.parse() {
                        settings.min_donation_amount = amount;
                    }
                }
                keys::RECEIPT_PREFIX => settings.receipt_prefix = value.clone(),
                keys::INSTANCE_ID => settings.instance_id = value.clone(),
                _ => {}
            }
        }
        settings
    }
}

/// Partial settings update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub organization_name: Option<String>,
    pub contact_email: Option<String>,
    pub min_donation_amount: Option<Decimal>,
    pub receipt_prefix: Option<String>,
}

impl SettingsUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(amount) = self.min_donation_amount {
            if amount <= Decimal::ZERO {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Minimum donation amount must be positive".to_string(),
                )));
            }
        }
        if let Some(prefix) = &self.receipt_prefix {
            if prefix.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Receipt prefix cannot be empty".to_string(),
                )));
            }
        }
        Ok(())
    }
}
