//! Notifications module - donor-facing receipt emails.
//!
//! Receipt dispatch is best-effort: callers log failures and never let
//! them affect the donation flow's outcome.

mod email_client;

use async_trait::async_trait;
use thiserror::Error;

use crate::donations::Donation;
use crate::donors::Donor;
use crate::programs::Program;

pub use email_client::{EmailClient, EmailConfig};

/// Errors raised by the notification dispatcher.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Email send failed: {0}")]
    SendFailed(String),

    #[error("Notification configuration error: {0}")]
    Config(String),
}

/// Trait for sending donation receipts.
#[async_trait]
pub trait ReceiptMailerTrait: Send + Sync {
    /// Sends a receipt for a completed donation.
    async fn send_receipt(
        &self,
        donor: &Donor,
        donation: &Donation,
        program: Option<&Program>,
    ) -> std::result::Result<(), NotificationError>;
}
