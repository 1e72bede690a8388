//! Database model for donations.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use seva_core::donations::{
    Dedication, Donation, DonationStatus, DonationType, NewDonation, Receipt,
};
use seva_core::reporting::DonationWithRefs;

/// Database model for donations
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
#[diesel(table_name = crate::schema::donations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DonationDB {
    pub id: String,
    pub donor_id: String,
    pub program_id: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub donation_type: String,
    pub status: String,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub transaction_id: Option<String>,
    pub receipt_number: Option<String>,
    pub receipt_generated_at: Option<NaiveDateTime>,
    pub is_anonymous: bool,
    pub dedicated_to_name: Option<String>,
    pub dedicated_to_message: Option<String>,
    pub campaign: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl From<DonationDB> for Donation {
    fn from(db: DonationDB) -> Self {
        let receipt = match (db.receipt_number, db.receipt_generated_at) {
            (Some(number), Some(generated_at)) => Some(Receipt {
                number,
                generated_at,
            }),
            _ => None,
        };
        let dedicated_to = db.dedicated_to_name.map(|dedication_name| Dedication {
            name: dedication_name,
            message: db.dedicated_to_message,
        });

        Self {
            id: db.id,
            donor_id: db.donor_id,
            program_id: db.program_id,
            amount: Decimal::from_f64(db.amount).unwrap_or_default(),
            currency: db.currency,
            donation_type: DonationType::from_str(&db.donation_type)
                .unwrap_or(DonationType::OneTime),
            status: DonationStatus::from_str(&db.status).unwrap_or_default(),
            gateway_order_id: db.gateway_order_id,
            gateway_payment_id: db.gateway_payment_id,
            gateway_signature: db.gateway_signature,
            transaction_id: db.transaction_id,
            receipt,
            is_anonymous: db.is_anonymous,
            dedicated_to,
            campaign: db.campaign,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewDonation> for DonationDB {
    fn from(domain: NewDonation) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let (dedicated_to_name, dedicated_to_message) = match domain.dedicated_to {
            Some(dedication) => (Some(dedication.name), dedication.message),
            None => (None, None),
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            donor_id: domain.donor_id,
            program_id: domain.program_id,
            amount: domain.amount.to_f64().unwrap_or_default(),
            currency: domain.currency,
            donation_type: domain.donation_type.as_str().to_string(),
            status: DonationStatus::Pending.as_str().to_string(),
            gateway_order_id: domain.gateway_order_id,
            gateway_payment_id: None,
            gateway_signature: None,
            transaction_id: None,
            receipt_number: None,
            receipt_generated_at: None,
            is_anonymous: domain.is_anonymous,
            dedicated_to_name,
            dedicated_to_message,
            campaign: domain.campaign,
            notes: domain.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Row shape for list/export queries: the donation plus joined donor and
/// program reference columns.
pub type DonationRefRow = (
    DonationDB,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// Maps a joined row into the domain reference model.
pub fn into_with_refs(row: DonationRefRow) -> DonationWithRefs {
    let (donation, donor_name, donor_email, donor_phone, donor_pan_number, program_title) = row;
    DonationWithRefs {
        donation: donation.into(),
        donor_name,
        donor_email,
        donor_phone,
        donor_pan_number,
        program_title,
    }
}
