//! Program domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Domain model representing a fundraising program.
///
/// `raised_amount` and `donor_count` are running ledger counters,
/// incremented exactly once per completed donation referencing the
/// program. There is no decrement path.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    /// Total completed donation amount earmarked for this program.
    pub raised_amount: Decimal,
    /// Number of completed donations earmarked for this program.
    pub donor_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new program.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProgram {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl NewProgram {
    /// Validates the new program data.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Program title cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}
