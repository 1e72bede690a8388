use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, warn};

use super::donations_model::{
    to_minor_units, CreateOrderRequest, Donation, DonationCompletion, DonationError,
    DonationReceipt, DonationStatus, DonorCredit, NewDonation, OrderCreated, ProgramCredit,
    Receipt, VerifyPaymentRequest,
};
use super::donations_traits::{DonationRepositoryTrait, DonationServiceTrait};
use crate::donors::DonorRepositoryTrait;
use crate::errors::{DatabaseError, Error, Result, ValidationError};
use crate::gateway::{signature, GatewayCredentials, PaymentGatewayTrait};
use crate::notifications::ReceiptMailerTrait;
use crate::programs::ProgramRepositoryTrait;
use crate::settings::SettingsServiceTrait;

/// Service orchestrating the donation payment flow.
pub struct DonationService {
    donation_repository: Arc<dyn DonationRepositoryTrait>,
    donor_repository: Arc<dyn DonorRepositoryTrait>,
    program_repository: Arc<dyn ProgramRepositoryTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
    gateway: Arc<dyn PaymentGatewayTrait>,
    credentials: GatewayCredentials,
    mailer: Option<Arc<dyn ReceiptMailerTrait>>,
}

impl DonationService {
    pub fn new(
        donation_repository: Arc<dyn DonationRepositoryTrait>,
        donor_repository: Arc<dyn DonorRepositoryTrait>,
        program_repository: Arc<dyn ProgramRepositoryTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
        gateway: Arc<dyn PaymentGatewayTrait>,
        credentials: GatewayCredentials,
    ) -> Self {
        Self {
            donation_repository,
            donor_repository,
            program_repository,
            settings_service,
            gateway,
            credentials,
            mailer: None,
        }
    }

    /// Attaches a receipt mailer. Without one, completions skip the email.
    pub fn with_mailer(mut self, mailer: Arc<dyn ReceiptMailerTrait>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Sends the receipt email for a completed donation. Best-effort:
    /// failures are logged and never surfaced to the caller.
    async fn dispatch_receipt(&self, donation: &Donation) {
        let Some(mailer) = &self.mailer else {
            debug!("No mailer configured, skipping receipt for {}", donation.id);
            return;
        };

        let donor = match self.donor_repository.get_by_id(&donation.donor_id) {
            Ok(donor) => donor,
            Err(e) => {
                error!("Receipt for donation {}: donor lookup failed: {}", donation.id, e);
                return;
            }
        };
        let program = donation
            .program_id
            .as_deref()
            .and_then(|pid| self.program_repository.get_by_id(pid).ok());

        if let Err(e) = mailer.send_receipt(&donor, donation, program.as_ref()).await {
            error!("Receipt email for donation {} failed: {}", donation.id, e);
        }
    }
}

#[async_trait]
impl DonationServiceTrait for DonationService {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<OrderCreated> {
        let settings = self.settings_service.get_settings()?;
        request.validate(settings.min_donation_amount)?;

        if let Some(program_id) = &request.program_id {
            self.program_repository.get_by_id(program_id).map_err(|e| match e {
                Error::Database(DatabaseError::NotFound(_)) => {
                    Error::Validation(ValidationError::InvalidInput(format!(
                        "Unknown program '{}'",
                        program_id
                    )))
                }
                other => other,
            })?;
        }

        // Donor upsert runs before the gateway call. If the gateway then
        // fails, the donor record is a harmless leftover: upserts are keyed
        // idempotently by email and no donation references it yet.
        let mut profile = request.donor_profile();
        profile.validate()?;
        let donor = self.donor_repository.upsert_by_email(profile).await?;

        let amount_minor = to_minor_units(request.amount)?;
        let order = self
            .gateway
            .create_order(amount_minor, &settings.currency, &donor.id)
            .await?;

        debug!(
            "Gateway order {} created for donor {}, persisting pending donation",
            order.order_id, donor.id
        );

        let donation = self
            .donation_repository
            .create(NewDonation {
                donor_id: donor.id,
                program_id: request.program_id,
                amount: request.amount,
                currency: settings.currency.clone(),
                donation_type: request.donation_type,
                gateway_order_id: order.order_id.clone(),
                is_anonymous: request.is_anonymous,
                dedicated_to: request.dedicated_to,
                campaign: request.campaign,
                notes: request.notes,
            })
            .await?;

        Ok(OrderCreated {
            order_id: order.order_id,
            donation_id: donation.id,
            amount: amount_minor,
            currency: settings.currency,
            key_id: self.credentials.key_id.clone(),
        })
    }

    async fn verify_and_complete(&self, request: VerifyPaymentRequest) -> Result<DonationReceipt> {
        // Signature first: an unauthenticated caller learns nothing about
        // which donation ids exist until it holds a validly signed payload.
        if !signature::verify_signature(
            &self.credentials.key_secret,
            &request.gateway_order_id,
            &request.gateway_payment_id,
            &request.gateway_signature,
        ) {
            warn!(
                "Signature mismatch on verification for donation {}",
                request.donation_id
            );
            return Err(DonationError::SignatureMismatch.into());
        }

        let donation = self.donation_repository.get_by_id(&request.donation_id)?;

        match donation.status {
            DonationStatus::Pending => {}
            DonationStatus::Completed => {
                // Replay of the recorded payload is a safe no-op returning
                // the cached receipt; anything else is rejected.
                let matches_recorded = donation.gateway_order_id == request.gateway_order_id
                    && donation.gateway_payment_id.as_deref()
                        == Some(request.gateway_payment_id.as_str())
                    && donation.gateway_signature.as_deref()
                        == Some(request.gateway_signature.as_str());
                if matches_recorded {
                    let receipt = donation.receipt.as_ref().ok_or_else(|| {
                        Error::Unexpected(format!(
                            "Completed donation {} has no receipt",
                            donation.id
                        ))
                    })?;
                    return Ok(DonationReceipt {
                        donation_id: donation.id.clone(),
                        receipt_number: receipt.number.clone(),
                        amount: donation.amount,
                    });
                }
                return Err(DonationError::CompletedPayloadMismatch.into());
            }
            other => {
                return Err(DonationError::InvalidTransition {
                    from: other,
                    to: DonationStatus::Completed,
                }
                .into());
            }
        }

        // Guard the transition explicitly even though the match above only
        // lets `pending` through.
        donation.status.transition(DonationStatus::Completed)?;

        let settings = self.settings_service.get_settings()?;
        let receipt = Receipt {
            number: format!("{}-{}", settings.receipt_prefix, Utc::now().timestamp_millis()),
            generated_at: Utc::now().naive_utc(),
        };

        let completion = DonationCompletion {
            donation_id: donation.id.clone(),
            gateway_payment_id: request.gateway_payment_id.clone(),
            gateway_signature: request.gateway_signature.clone(),
            receipt,
            donor_credit: DonorCredit {
                donor_id: donation.donor_id.clone(),
                amount: donation.amount,
                mark_recurring: donation.donation_type.is_recurring(),
            },
            program_credit: donation.program_id.as_ref().map(|pid| ProgramCredit {
                program_id: pid.clone(),
                amount: donation.amount,
            }),
        };

        let completed = self.donation_repository.complete_and_credit(completion).await?;

        // Awaited but best-effort; a mailer failure never rolls back the
        // completed status.
        self.dispatch_receipt(&completed).await;

        let receipt = completed.receipt.as_ref().ok_or_else(|| {
            Error::Unexpected(format!("Completed donation {} has no receipt", completed.id))
        })?;

        Ok(DonationReceipt {
            donation_id: completed.id.clone(),
            receipt_number: receipt.number.clone(),
            amount: completed.amount,
        })
    }

    fn get_donation(&self, donation_id: &str) -> Result<Donation> {
        self.donation_repository.get_by_id(donation_id)
    }
}
