use std::sync::Arc;

use async_trait::async_trait;

use super::donors_model::{Donor, DonorProfile};
use super::donors_traits::{DonorRepositoryTrait, DonorServiceTrait};
use crate::errors::Result;

/// Service for managing donors.
pub struct DonorService {
    repository: Arc<dyn DonorRepositoryTrait>,
}

impl DonorService {
    pub fn new(repository: Arc<dyn DonorRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl DonorServiceTrait for DonorService {
    async fn upsert_donor(&self, mut profile: DonorProfile) -> Result<Donor> {
        profile.validate()?;
        self.repository.upsert_by_email(profile).await
    }

    fn get_donor(&self, donor_id: &str) -> Result<Donor> {
        self.repository.get_by_id(donor_id)
    }

    fn list_donors(&self, page: i64, page_size: i64) -> Result<(Vec<Donor>, i64)> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 200);
        self.repository.list(page, page_size)
    }
}
