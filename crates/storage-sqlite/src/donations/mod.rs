//! SQLite storage implementation for donations.

mod model;
mod repository;

pub use model::DonationDB;
pub use repository::DonationRepository;
