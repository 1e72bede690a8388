//! HTTP transactional email client for donation receipts.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Serialize;

use super::{NotificationError, ReceiptMailerTrait};
use crate::donations::Donation;
use crate::donors::Donor;
use crate::programs::Program;

/// Configuration for the transactional email sender.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Base URL of the email API (e.g. `https://api.postmarkapp.com`).
    pub base_url: String,
    /// Server token sent in the `X-Server-Token` header.
    pub auth_token: String,
    /// Sender address for receipts.
    pub from_address: String,
    /// Organization name used in the subject line.
    pub organization_name: String,
}

/// Receipt mailer posting to a transactional email HTTP API.
pub struct EmailClient {
    client: Client,
    config: EmailConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailBody<'a> {
    from: &'a str,
    to: &'a str,
    subject: String,
    text_body: String,
}

impl EmailClient {
    /// Creates a new client with a 10 second request timeout.
    pub fn new(config: EmailConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    fn receipt_body(donor: &Donor, donation: &Donation, program: Option<&Program>) -> String {
        let receipt_number = donation
            .receipt
            .as_ref()
            .map(|r| r.number.clone())
            .unwrap_or_default();
        let earmark = program
            .map(|p| format!("toward {}", p.title))
            .unwrap_or_else(|| "to our general fund".to_string());

        format!(
            "Dear {},\n\n\
             Thank you for your donation of {} {} {}.\n\n\
             Receipt number: {}\n\
             Transaction reference: {}\n\n\
             This receipt is your proof of donation for tax purposes.\n",
            donor.name,
            donation.currency,
            donation.amount,
            earmark,
            receipt_number,
            donation.transaction_id.as_deref().unwrap_or("-"),
        )
    }
}

#[async_trait]
impl ReceiptMailerTrait for EmailClient {
    async fn send_receipt(
        &self,
        donor: &Donor,
        donation: &Donation,
        program: Option<&Program>,
    ) -> std::result::Result<(), NotificationError> {
        let url = format!("{}/email", self.config.base_url.trim_end_matches('/'));
        let body = SendEmailBody {
            from: &self.config.from_address,
            to: &donor.email,
            subject: format!(
                "{} - Donation receipt {}",
                self.config.organization_name,
                donation
                    .receipt
                    .as_ref()
                    .map(|r| r.number.as_str())
                    .unwrap_or(""),
            ),
            text_body: Self::receipt_body(donor, donation, program),
        };

        debug!("Sending receipt email for donation {}", donation.id);

        let response = self
            .client
            .post(&url)
            .header("X-Server-Token", &self.config.auth_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(NotificationError::SendFailed(format!(
                "HTTP {} - {}",
                status, text
            )));
        }

        Ok(())
    }
}
