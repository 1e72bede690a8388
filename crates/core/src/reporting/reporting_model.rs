//! Reporting domain models: filters, list pages, and aggregates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::donations::{Donation, DonationStatus};

/// Filters applied to donation list, stats, and export queries.
///
/// Date bounds are inclusive and apply to the donation's creation date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationFilters {
    pub status: Option<DonationStatus>,
    pub program_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

/// A donation row with its donor and program references populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationWithRefs {
    #[serde(flatten)]
    pub donation: Donation,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: Option<String>,
    pub donor_pan_number: Option<String>,
    pub program_title: Option<String>,
}

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// Paginated donation list envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationPage {
    pub success: bool,
    pub data: Vec<DonationWithRefs>,
    pub pagination: Pagination,
}

/// Aggregate summary over completed donations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_amount: Decimal,
    pub total_count: i64,
    pub avg_amount: Decimal,
}

/// Per-program aggregate over completed donations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStats {
    pub program_id: String,
    pub program_title: String,
    pub total_amount: Decimal,
    pub donation_count: i64,
}

/// Stats response: overall summary plus per-program breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationStats {
    pub summary: StatsSummary,
    pub by_program: Vec<ProgramStats>,
}
