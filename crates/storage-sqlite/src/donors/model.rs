//! Database model for donors.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use seva_core::donors::{Donor, DonorProfile};

/// Database model for donors
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::donors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DonorDB {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub pan_number: Option<String>,
    pub total_donated: f64,
    pub donation_count: i64,
    pub is_recurring_donor: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl DonorDB {
    /// Builds a fresh row for a first-time donor with zeroed aggregates.
    pub fn from_profile(profile: DonorProfile) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: profile.email,
            name: profile.name,
            phone: profile.phone,
            address: profile.address,
            pan_number: profile.pan_number,
            total_donated: 0.0,
            donation_count: 0,
            is_recurring_donor: false,
            created_at: now,
            updated_at: now,
        }
    }
}

// Conversion implementations
impl From<DonorDB> for Donor {
    fn from(db: DonorDB) -> Self {
        Self {
            id: db.id,
            email: db.email,
            name: db.name,
            phone: db.phone,
            address: db.address,
            pan_number: db.pan_number,
            total_donated: Decimal::from_f64(db.total_donated).unwrap_or_default(),
            donation_count: db.donation_count,
            is_recurring_donor: db.is_recurring_donor,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
