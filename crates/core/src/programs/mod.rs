//! Programs module - fundraising initiatives a donation may be earmarked for.

mod programs_model;
mod programs_service;
mod programs_traits;

// Re-export the public interface
pub use programs_model::{NewProgram, Program};
pub use programs_service::ProgramService;
pub use programs_traits::{ProgramRepositoryTrait, ProgramServiceTrait};
