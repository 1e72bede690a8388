//! Payment gateway adapter.
//!
//! Isolates all interaction with the external payment processor:
//! order creation (over HTTP) and callback signature verification
//! (pure HMAC computation, no network).

mod razorpay;
pub mod signature;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use razorpay::RazorpayClient;

/// Errors raised by the payment gateway adapter.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The gateway did not respond within the configured timeout.
    #[error("Gateway request timed out")]
    Timeout,

    /// The gateway rejected the request or returned a failure status.
    #[error("Gateway rejected the request: {0}")]
    Rejected(String),

    /// The gateway response could not be parsed.
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),

    /// The adapter is misconfigured (missing or malformed credentials).
    #[error("Gateway configuration error: {0}")]
    Config(String),
}

/// API credentials for the payment gateway.
///
/// `key_id` is public (shipped to the browser for checkout); `key_secret`
/// signs order/payment pairs and never leaves the server.
#[derive(Debug, Clone)]
pub struct GatewayCredentials {
    pub key_id: String,
    pub key_secret: String,
}

/// An order minted with the external payment processor, correlated 1:1
/// with a donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrder {
    /// The processor's order identifier.
    pub order_id: String,
    /// Order amount in minor currency units, as accepted by the processor.
    pub amount_minor_units: i64,
    pub currency: String,
}

/// Trait for creating orders with the external payment processor.
///
/// Signature verification is deliberately not part of this trait: it is a
/// pure function of the credentials and callback fields (see [`signature`]),
/// and keeping it out of the trait keeps mocks honest in tests.
#[async_trait]
pub trait PaymentGatewayTrait: Send + Sync {
    /// Creates an order for `amount_minor_units` of `currency`.
    ///
    /// `receipt_note` is an opaque reference stored with the order on the
    /// processor side. Fails with [`GatewayError`] if the processor is
    /// unreachable or rejects the order; no retry is attempted.
    async fn create_order(
        &self,
        amount_minor_units: i64,
        currency: &str,
        receipt_note: &str,
    ) -> std::result::Result<GatewayOrder, GatewayError>;
}
