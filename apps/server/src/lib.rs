//! Seva server library: router construction and state wiring, exposed for
//! integration tests and the binary entry point.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod main_lib;

pub use main_lib::{build_state, AppState};
