//! Donation repository and service traits.
//!
//! These traits define the contract for donation operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::donations_model::{
    CreateOrderRequest, Donation, DonationCompletion, DonationReceipt, NewDonation, OrderCreated,
    VerifyPaymentRequest,
};
use crate::errors::Result;
use crate::reporting::{DonationFilters, DonationWithRefs};

/// Trait defining the contract for Donation repository operations.
#[async_trait]
pub trait DonationRepositoryTrait: Send + Sync {
    /// Persists a new donation in `pending` status.
    async fn create(&self, new_donation: NewDonation) -> Result<Donation>;

    /// Retrieves a donation by its ID.
    fn get_by_id(&self, donation_id: &str) -> Result<Donation>;

    /// Applies a verified completion as one unit of work: flips the
    /// donation to `completed` with its gateway identifiers and receipt,
    /// credits the donor aggregates, and credits the program ledger when
    /// one is referenced. Counter updates must be atomic increments.
    async fn complete_and_credit(&self, completion: DonationCompletion) -> Result<Donation>;

    /// Searches donations with filters and pagination, returning the page
    /// of rows (with donor/program references joined) and the total count.
    fn search(
        &self,
        filters: &DonationFilters,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<DonationWithRefs>, i64)>;

    /// Lists completed donations matching the filters, unpaginated.
    /// Used by stats aggregation and CSV export.
    fn list_completed(&self, filters: &DonationFilters) -> Result<Vec<DonationWithRefs>>;
}

/// Trait defining the contract for the donation payment flow.
#[async_trait]
pub trait DonationServiceTrait: Send + Sync {
    /// Creates a gateway order and a pending donation, upserting the donor.
    async fn create_order(&self, request: CreateOrderRequest) -> Result<OrderCreated>;

    /// Verifies a payment callback signature and, on success, completes
    /// the donation and credits the donor/program ledgers.
    async fn verify_and_complete(&self, request: VerifyPaymentRequest) -> Result<DonationReceipt>;

    /// Retrieves a donation by ID.
    fn get_donation(&self, donation_id: &str) -> Result<Donation>;
}
