//! Donations module - the payment flow from order creation to
//! signature-verified completion.

mod donations_model;
mod donations_service;
mod donations_traits;

#[cfg(test)]
mod donations_model_tests;
#[cfg(test)]
mod donations_service_tests;

// Re-export the public interface
pub use donations_model::{
    to_minor_units, CreateOrderRequest, Dedication, Donation, DonationCompletion, DonationError,
    DonationReceipt, DonationStatus, DonationType, DonorCredit, NewDonation, OrderCreated,
    ProgramCredit, Receipt, VerifyPaymentRequest,
};
pub use donations_service::DonationService;
pub use donations_traits::{DonationRepositoryTrait, DonationServiceTrait};
