use async_trait::async_trait;
use diesel::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{donations, donors, programs};

use super::model::{into_with_refs, DonationDB, DonationRefRow};
use seva_core::donations::{
    Donation, DonationCompletion, DonationRepositoryTrait, DonationStatus, NewDonation,
};
use seva_core::errors::Result;
use seva_core::reporting::{DonationFilters, DonationWithRefs};

/// Repository for managing donation data in the database
pub struct DonationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DonationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

/// Applies the list filters to a boxed donations query.
macro_rules! apply_filters {
    ($query:expr, $filters:expr) => {{
        let mut query = $query;
        if let Some(status) = &$filters.status {
            query = query.filter(donations::status.eq(status.as_str()));
        }
        if let Some(program_id) = &$filters.program_id {
            query = query.filter(donations::program_id.eq(program_id.clone()));
        }
        if let Some(date_from) = $filters.date_from {
            if let Some(start) = date_from.and_hms_opt(0, 0, 0) {
                query = query.filter(donations::created_at.ge(start));
            }
        }
        if let Some(date_to) = $filters.date_to {
            if let Some(end) = date_to.and_hms_opt(23, 59, 59) {
                query = query.filter(donations::created_at.le(end));
            }
        }
        if let Some(min_amount) = $filters.min_amount {
            query = query.filter(donations::amount.ge(min_amount.to_f64().unwrap_or(0.0)));
        }
        if let Some(max_amount) = $filters.max_amount {
            query = query.filter(donations::amount.le(max_amount.to_f64().unwrap_or(f64::MAX)));
        }
        query
    }};
}

#[async_trait]
impl DonationRepositoryTrait for DonationRepository {
    async fn create(&self, new_donation: NewDonation) -> Result<Donation> {
        self.writer
            .exec(move |conn| {
                let row: DonationDB = new_donation.into();
                diesel::insert_into(donations::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    fn get_by_id(&self, donation_id: &str) -> Result<Donation> {
        let mut conn = get_connection(&self.pool)?;

        let donation = donations::table
            .select(DonationDB::as_select())
            .find(donation_id)
            .first::<DonationDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(donation.into())
    }

    /// Applies a verified completion in one transaction (the write actor
    /// wraps every job in an immediate transaction): the donation status
    /// flip plus atomic ledger increments for the donor and, when
    /// referenced, the program.
    async fn complete_and_credit(&self, completion: DonationCompletion) -> Result<Donation> {
        self.writer
            .exec(move |conn| {
                let now = chrono::Utc::now().naive_utc();

                diesel::update(donations::table.find(&completion.donation_id))
                    .set((
                        donations::status.eq(DonationStatus::Completed.as_str()),
                        donations::gateway_payment_id.eq(Some(&completion.gateway_payment_id)),
                        donations::gateway_signature.eq(Some(&completion.gateway_signature)),
                        donations::transaction_id.eq(Some(&completion.gateway_payment_id)),
                        donations::receipt_number.eq(Some(&completion.receipt.number)),
                        donations::receipt_generated_at.eq(Some(completion.receipt.generated_at)),
                        donations::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let credit_amount = completion
                    .donor_credit
                    .amount
                    .to_f64()
                    .unwrap_or_default();
                diesel::update(donors::table.find(&completion.donor_credit.donor_id))
                    .set((
                        donors::total_donated.eq(donors::total_donated + credit_amount),
                        donors::donation_count.eq(donors::donation_count + 1),
                        donors::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                if completion.donor_credit.mark_recurring {
                    diesel::update(donors::table.find(&completion.donor_credit.donor_id))
                        .set(donors::is_recurring_donor.eq(true))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                if let Some(program_credit) = &completion.program_credit {
                    let program_amount = program_credit.amount.to_f64().unwrap_or_default();
                    diesel::update(programs::table.find(&program_credit.program_id))
                        .set((
                            programs::raised_amount.eq(programs::raised_amount + program_amount),
                            programs::donor_count.eq(programs::donor_count + 1),
                            programs::updated_at.eq(now),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                let updated = donations::table
                    .select(DonationDB::as_select())
                    .find(&completion.donation_id)
                    .first::<DonationDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(updated.into())
            })
            .await
    }

    fn search(
        &self,
        filters: &DonationFilters,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<DonationWithRefs>, i64)> {
        let mut conn = get_connection(&self.pool)?;

        // Filters only touch donation columns, so the count can skip the joins.
        let count_query = apply_filters!(donations::table.into_boxed(), filters);
        let total: i64 = count_query
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;

        let query = apply_filters!(
            donations::table
                .inner_join(donors::table)
                .left_join(programs::table)
                .into_boxed(),
            filters
        );
        let rows = query
            .order(donations::created_at.desc())
            .limit(page_size)
            .offset((page - 1) * page_size)
            .select((
                DonationDB::as_select(),
                donors::name,
                donors::email,
                donors::phone,
                donors::pan_number,
                programs::title.nullable(),
            ))
            .load::<DonationRefRow>(&mut conn)
            .map_err(StorageError::from)?;

        Ok((rows.into_iter().map(into_with_refs).collect(), total))
    }

    fn list_completed(&self, filters: &DonationFilters) -> Result<Vec<DonationWithRefs>> {
        let mut conn = get_connection(&self.pool)?;

        let query = apply_filters!(
            donations::table
                .inner_join(donors::table)
                .left_join(programs::table)
                .into_boxed(),
            filters
        );
        let rows = query
            .filter(donations::status.eq(DonationStatus::Completed.as_str()))
            .order(donations::created_at.asc())
            .select((
                DonationDB::as_select(),
                donors::name,
                donors::email,
                donors::phone,
                donors::pan_number,
                programs::title.nullable(),
            ))
            .load::<DonationRefRow>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(into_with_refs).collect())
    }
}
