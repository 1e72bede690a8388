//! Database model for programs.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use seva_core::programs::{NewProgram, Program};

/// Database model for programs
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
#[diesel(table_name = crate::schema::programs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProgramDB {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub raised_amount: f64,
    pub donor_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl From<ProgramDB> for Program {
    fn from(db: ProgramDB) -> Self {
        Self {
            id: db.id,
            title: db.title,
            description: db.description,
            is_active: db.is_active,
            raised_amount: Decimal::from_f64(db.raised_amount).unwrap_or_default(),
            donor_count: db.donor_count,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewProgram> for ProgramDB {
    fn from(domain: NewProgram) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title: domain.title,
            description: domain.description,
            is_active: domain.is_active,
            raised_amount: 0.0,
            donor_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
