//! Reporting module - read-only aggregation and export over donations.

mod csv_export;
mod reporting_model;
mod reporting_service;

// Re-export the public interface
pub use csv_export::write_donations_csv;
pub use reporting_model::{
    DonationFilters, DonationPage, DonationStats, DonationWithRefs, Pagination, ProgramStats,
    StatsSummary,
};
pub use reporting_service::{ReportingService, ReportingServiceTrait};
