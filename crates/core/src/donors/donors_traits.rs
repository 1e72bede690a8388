//! Donor repository and service traits.
//!
//! These traits define the contract for donor operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::donors_model::{Donor, DonorProfile};
use crate::errors::Result;

/// Trait defining the contract for Donor repository operations.
#[async_trait]
pub trait DonorRepositoryTrait: Send + Sync {
    /// Creates or updates a donor keyed by normalized email.
    ///
    /// On an existing donor the contact fields are overwritten
    /// last-write-wins; aggregates are left untouched.
    async fn upsert_by_email(&self, profile: DonorProfile) -> Result<Donor>;

    /// Retrieves a donor by its ID.
    fn get_by_id(&self, donor_id: &str) -> Result<Donor>;

    /// Retrieves a donor by normalized email.
    fn get_by_email(&self, email: &str) -> Result<Donor>;

    /// Lists donors ordered by lifetime total, newest first on ties.
    ///
    /// Returns the page of donors and the total donor count.
    fn list(&self, page: i64, page_size: i64) -> Result<(Vec<Donor>, i64)>;
}

/// Trait defining the contract for Donor service operations.
#[async_trait]
pub trait DonorServiceTrait: Send + Sync {
    /// Upserts a donor from order-creation profile data.
    async fn upsert_donor(&self, profile: DonorProfile) -> Result<Donor>;

    /// Retrieves a donor by ID.
    fn get_donor(&self, donor_id: &str) -> Result<Donor>;

    /// Lists donors with pagination.
    fn list_donors(&self, page: i64, page_size: i64) -> Result<(Vec<Donor>, i64)>;
}
