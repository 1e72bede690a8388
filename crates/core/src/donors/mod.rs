//! Donors module - domain models, services, and traits.

mod donors_model;
mod donors_service;
mod donors_traits;

#[cfg(test)]
mod donors_model_tests;

// Re-export the public interface
pub use donors_model::{normalize_email, Donor, DonorProfile};
pub use donors_service::DonorService;
pub use donors_traits::{DonorRepositoryTrait, DonorServiceTrait};
