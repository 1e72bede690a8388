use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::donors;
use crate::schema::donors::dsl::*;

use super::model::DonorDB;
use seva_core::donors::{Donor, DonorProfile, DonorRepositoryTrait};
use seva_core::errors::Result;

/// Repository for managing donor data in the database
pub struct DonorRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DonorRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl DonorRepositoryTrait for DonorRepository {
    /// Creates or updates a donor keyed by normalized email.
    ///
    /// Contact fields are overwritten last-write-wins; the aggregate
    /// columns are never touched here.
    async fn upsert_by_email(&self, profile: DonorProfile) -> Result<Donor> {
        self.writer
            .exec(move |conn| {
                let existing = donors
                    .filter(email.eq(&profile.email))
                    .select(DonorDB::as_select())
                    .first::<DonorDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;

                match existing {
                    Some(row) => {
                        diesel::update(donors.find(&row.id))
                            .set((
                                name.eq(profile.name.clone()),
                                phone.eq(profile.phone.clone()),
                                address.eq(profile.address.clone()),
                                pan_number.eq(profile.pan_number.clone()),
                                updated_at.eq(chrono::Utc::now().naive_utc()),
                            ))
                            .execute(conn)
                            .map_err(StorageError::from)?;

                        let updated = donors
                            .select(DonorDB::as_select())
                            .find(&row.id)
                            .first::<DonorDB>(conn)
                            .map_err(StorageError::from)?;
                        Ok(updated.into())
                    }
                    None => {
                        let row = DonorDB::from_profile(profile);
                        diesel::insert_into(donors::table)
                            .values(&row)
                            .execute(conn)
                            .map_err(StorageError::from)?;
                        Ok(row.into())
                    }
                }
            })
            .await
    }

    /// Retrieves a donor by its ID
    fn get_by_id(&self, donor_id: &str) -> Result<Donor> {
        let mut conn = get_connection(&self.pool)?;

        let donor = donors
            .select(DonorDB::as_select())
            .find(donor_id)
            .first::<DonorDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(donor.into())
    }

    /// Retrieves a donor by normalized email
    fn get_by_email(&self, email_param: &str) -> Result<Donor> {
        let mut conn = get_connection(&self.pool)?;

        let donor = donors
            .filter(email.eq(email_param))
            .select(DonorDB::as_select())
            .first::<DonorDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(donor.into())
    }

    /// Lists donors by lifetime total, returning the page and total count
    fn list(&self, page: i64, page_size: i64) -> Result<(Vec<Donor>, i64)> {
        let mut conn = get_connection(&self.pool)?;

        let total: i64 = donors
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;

        let results = donors
            .select(DonorDB::as_select())
            .order((total_donated.desc(), created_at.desc()))
            .limit(page_size)
            .offset((page - 1) * page_size)
            .load::<DonorDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok((results.into_iter().map(Donor::from).collect(), total))
    }
}
