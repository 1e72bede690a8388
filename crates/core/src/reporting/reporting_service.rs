use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use super::csv_export::write_donations_csv;
use super::reporting_model::{
    DonationFilters, DonationPage, DonationStats, Pagination, ProgramStats, StatsSummary,
};
use crate::donations::{DonationRepositoryTrait, DonationStatus};
use crate::errors::Result;

/// Trait defining the contract for reporting operations.
pub trait ReportingServiceTrait: Send + Sync {
    /// Lists donations with filters and a pagination envelope.
    fn list_donations(
        &self,
        filters: DonationFilters,
        page: i64,
        page_size: i64,
    ) -> Result<DonationPage>;

    /// Aggregates completed donations into summary and per-program stats.
    fn donation_stats(&self, filters: DonationFilters) -> Result<DonationStats>;

    /// Serializes completed donations in the filter range as CSV.
    fn export_csv(&self, filters: DonationFilters) -> Result<String>;
}

/// Read-side service over the donation repository.
pub struct ReportingService {
    donation_repository: Arc<dyn DonationRepositoryTrait>,
}

impl ReportingService {
    pub fn new(donation_repository: Arc<dyn DonationRepositoryTrait>) -> Self {
        Self { donation_repository }
    }

    /// Forces the completed-only view used by stats and export.
    fn completed_only(mut filters: DonationFilters) -> DonationFilters {
        filters.status = Some(DonationStatus::Completed);
        filters
    }
}

impl ReportingServiceTrait for ReportingService {
    fn list_donations(
        &self,
        filters: DonationFilters,
        page: i64,
        page_size: i64,
    ) -> Result<DonationPage> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 500);
        let (data, total) = self.donation_repository.search(&filters, page, page_size)?;
        Ok(DonationPage {
            success: true,
            data,
            pagination: Pagination::new(page, page_size, total),
        })
    }

    fn donation_stats(&self, filters: DonationFilters) -> Result<DonationStats> {
        let rows = self
            .donation_repository
            .list_completed(&Self::completed_only(filters))?;

        let total_count = rows.len() as i64;
        let total_amount: Decimal = rows.iter().map(|r| r.donation.amount).sum();
        let avg_amount = if total_count > 0 {
            (total_amount / Decimal::from(total_count)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        // Keyed by program id so the breakdown is stable across runs.
        let mut by_program: BTreeMap<String, ProgramStats> = BTreeMap::new();
        for row in &rows {
            let Some(program_id) = &row.donation.program_id else {
                continue;
            };
            let entry = by_program
                .entry(program_id.clone())
                .or_insert_with(|| ProgramStats {
                    program_id: program_id.clone(),
                    program_title: row.program_title.clone().unwrap_or_default(),
                    total_amount: Decimal::ZERO,
                    donation_count: 0,
                });
            entry.total_amount += row.donation.amount;
            entry.donation_count += 1;
        }

        Ok(DonationStats {
            summary: StatsSummary {
                total_amount,
                total_count,
                avg_amount,
            },
            by_program: by_program.into_values().collect(),
        })
    }

    fn export_csv(&self, filters: DonationFilters) -> Result<String> {
        let rows = self
            .donation_repository
            .list_completed(&Self::completed_only(filters))?;
        write_donations_csv(&rows)
    }
}
