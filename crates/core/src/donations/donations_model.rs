//! Donation domain models and the donation status state machine.

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::MINOR_UNITS_PER_MAJOR;
use crate::donors::DonorProfile;
use crate::{errors::ValidationError, Error, Result};

/// Errors specific to the donation payment flow.
#[derive(Error, Debug)]
pub enum DonationError {
    /// The supplied callback signature does not match the expected digest.
    #[error("Payment signature verification failed")]
    SignatureMismatch,

    /// The requested status change is not a legal transition.
    #[error("Invalid donation status transition: {from} -> {to}")]
    InvalidTransition {
        from: DonationStatus,
        to: DonationStatus,
    },

    /// A verification callback for an already-completed donation carried
    /// gateway fields different from the recorded ones.
    #[error("Verification payload does not match the completed donation")]
    CompletedPayloadMismatch,
}

/// Cadence of a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DonationType {
    OneTime,
    Monthly,
    Quarterly,
    Yearly,
}

impl DonationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationType::OneTime => "one-time",
            DonationType::Monthly => "monthly",
            DonationType::Quarterly => "quarterly",
            DonationType::Yearly => "yearly",
        }
    }

    pub fn from_str(value: &str) -> Result<Self> {
        match value {
            "one-time" => Ok(DonationType::OneTime),
            "monthly" => Ok(DonationType::Monthly),
            "quarterly" => Ok(DonationType::Quarterly),
            "yearly" => Ok(DonationType::Yearly),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "'{}' is not a valid donation type",
                other
            )))),
        }
    }

    /// A donation of any cadence other than one-time marks its donor
    /// as recurring once it completes.
    pub fn is_recurring(&self) -> bool {
        !matches!(self, DonationType::OneTime)
    }
}

/// Lifecycle state of a donation attempt.
///
/// `pending -> completed` is the only transition taken by the payment
/// flow. `failed` and `refunded` are reachable solely through
/// administrative intervention; no code path here issues them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Completed => "completed",
            DonationStatus::Failed => "failed",
            DonationStatus::Refunded => "refunded",
        }
    }

    pub fn from_str(value: &str) -> Result<Self> {
        match value {
            "pending" => Ok(DonationStatus::Pending),
            "completed" => Ok(DonationStatus::Completed),
            "failed" => Ok(DonationStatus::Failed),
            "refunded" => Ok(DonationStatus::Refunded),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "'{}' is not a valid donation status",
                other
            )))),
        }
    }

    /// Whether `self -> to` is a legal transition.
    ///
    /// Allowed: pending -> completed (payment flow), pending -> failed
    /// and completed -> refunded (administrative only).
    pub fn can_transition_to(&self, to: DonationStatus) -> bool {
        matches!(
            (self, to),
            (DonationStatus::Pending, DonationStatus::Completed)
                | (DonationStatus::Pending, DonationStatus::Failed)
                | (DonationStatus::Completed, DonationStatus::Refunded)
        )
    }

    /// Validates a transition, returning the target state or an
    /// [`DonationError::InvalidTransition`].
    pub fn transition(self, to: DonationStatus) -> std::result::Result<DonationStatus, DonationError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(DonationError::InvalidTransition { from: self, to })
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Donor-facing proof of donation, generated at completion time.
///
/// The number is time-based (`<prefix>-<epoch millis>`) and not
/// guaranteed unique under concurrent completions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub number: String,
    pub generated_at: NaiveDateTime,
}

/// Optional dedication attached to a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dedication {
    pub name: String,
    pub message: Option<String>,
}

/// Domain model for one attempted monetary contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub donor_id: String,
    pub program_id: Option<String>,
    /// Amount in major currency units (whole rupees).
    pub amount: Decimal,
    pub currency: String,
    #[serde(rename = "type")]
    pub donation_type: DonationType,
    pub status: DonationStatus,
    /// Set once at order creation; never changes.
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    /// Unique-sparse reference, equal to the gateway payment id; set only
    /// on completion.
    pub transaction_id: Option<String>,
    pub receipt: Option<Receipt>,
    pub is_anonymous: bool,
    pub dedicated_to: Option<Dedication>,
    pub campaign: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for persisting a new pending donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    pub donor_id: String,
    pub program_id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub donation_type: DonationType,
    pub gateway_order_id: String,
    pub is_anonymous: bool,
    pub dedicated_to: Option<Dedication>,
    pub campaign: Option<String>,
    pub notes: Option<String>,
}

/// Request DTO for creating a donation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub amount: Decimal,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: Option<String>,
    pub donor_address: Option<String>,
    pub pan_number: Option<String>,
    pub program_id: Option<String>,
    #[serde(rename = "type")]
    pub donation_type: DonationType,
    #[serde(default)]
    pub is_anonymous: bool,
    pub dedicated_to: Option<Dedication>,
    pub campaign: Option<String>,
    pub notes: Option<String>,
}

impl CreateOrderRequest {
    /// Validates the amount against the configured minimum. Donor fields
    /// are validated by [`DonorProfile::validate`] during the upsert.
    pub fn validate(&self, min_amount: Decimal) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Donation amount must be a positive number".to_string(),
            )));
        }
        if self.amount < min_amount {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Donation amount must be at least {}",
                min_amount
            ))));
        }
        Ok(())
    }

    /// Extracts the donor profile fields for the upsert.
    pub fn donor_profile(&self) -> DonorProfile {
        DonorProfile {
            email: self.donor_email.clone(),
            name: self.donor_name.clone(),
            phone: self.donor_phone.clone(),
            address: self.donor_address.clone(),
            pan_number: self.pan_number.clone(),
        }
    }
}

/// Request DTO for the payment verification callback.
///
/// Wire field names follow the gateway's callback convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(rename = "razorpay_order_id")]
    pub gateway_order_id: String,
    #[serde(rename = "razorpay_payment_id")]
    pub gateway_payment_id: String,
    #[serde(rename = "razorpay_signature")]
    pub gateway_signature: String,
    #[serde(rename = "donationId")]
    pub donation_id: String,
}

/// Response for a successfully created order, carrying what the
/// client-side checkout needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order_id: String,
    pub donation_id: String,
    /// Order amount in minor currency units, as registered with the gateway.
    pub amount: i64,
    pub currency: String,
    /// Public gateway key for the checkout widget.
    pub key_id: String,
}

/// Response for a successfully verified donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationReceipt {
    pub donation_id: String,
    pub receipt_number: String,
    /// Amount in major currency units.
    pub amount: Decimal,
}

/// Donor aggregate update applied on completion.
#[derive(Debug, Clone)]
pub struct DonorCredit {
    pub donor_id: String,
    pub amount: Decimal,
    /// Set the recurring flag; never clears it.
    pub mark_recurring: bool,
}

/// Program ledger update applied on completion.
#[derive(Debug, Clone)]
pub struct ProgramCredit {
    pub program_id: String,
    pub amount: Decimal,
}

/// The grouped write performed when a verification succeeds: the donation
/// status flip plus the donor/program ledger credits. Storage executes
/// this as a single unit of work.
#[derive(Debug, Clone)]
pub struct DonationCompletion {
    pub donation_id: String,
    pub gateway_payment_id: String,
    pub gateway_signature: String,
    pub receipt: Receipt,
    pub donor_credit: DonorCredit,
    pub program_credit: Option<ProgramCredit>,
}

/// Converts a major-unit amount to the gateway's minor units (x100).
///
/// The conversion boundary lives here and nowhere else; donation records
/// store major units while gateway orders are transmitted in minor units.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    (amount * Decimal::from(MINOR_UNITS_PER_MAJOR))
        .round_dp(0)
        .to_i64()
        .ok_or_else(|| {
            Error::Validation(ValidationError::InvalidInput(format!(
                "Amount {} cannot be expressed in minor units",
                amount
            )))
        })
}
