//! Razorpay order-creation client.
//!
//! Creates orders via `POST /v1/orders` with basic auth. Amounts are
//! expressed in minor currency units (paise) on the wire.
//! API documentation: https://razorpay.com/docs/api/orders/

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{GatewayCredentials, GatewayError, GatewayOrder, PaymentGatewayTrait};

const BASE_URL: &str = "https://api.razorpay.com/v1";

/// Request body for /orders.
#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    /// Amount in minor units (paise).
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// Successful response from /orders.
#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

/// Error envelope returned by the gateway on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    description: Option<String>,
}

/// Razorpay implementation of the payment gateway adapter.
pub struct RazorpayClient {
    client: Client,
    credentials: GatewayCredentials,
    base_url: String,
}

impl RazorpayClient {
    /// Creates a new client with a 30 second request timeout.
    pub fn new(credentials: GatewayCredentials) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            credentials,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Overrides the API base URL. Used to point at a stub server in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl PaymentGatewayTrait for RazorpayClient {
    async fn create_order(
        &self,
        amount_minor_units: i64,
        currency: &str,
        receipt_note: &str,
    ) -> std::result::Result<GatewayOrder, GatewayError> {
        let url = format!("{}/orders", self.base_url);
        let body = CreateOrderBody {
            amount: amount_minor_units,
            currency,
            receipt: receipt_note,
        };

        debug!("Creating gateway order for {} {}", amount_minor_units, currency);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.key_id, Some(&self.credentials.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Rejected(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.description)
                .unwrap_or_else(|| format!("HTTP {} - {}", status, text));
            return Err(GatewayError::Rejected(message));
        }

        let order: OrderResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(GatewayOrder {
            order_id: order.id,
            amount_minor_units: order.amount,
            currency: order.currency,
        })
    }
}
