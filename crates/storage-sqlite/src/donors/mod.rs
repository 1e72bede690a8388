//! SQLite storage implementation for donors.

mod model;
mod repository;

pub use model::DonorDB;
pub use repository::DonorRepository;
