//! Program repository and service traits.

use async_trait::async_trait;

use super::programs_model::{NewProgram, Program};
use crate::errors::Result;

/// Trait defining the contract for Program repository operations.
#[async_trait]
pub trait ProgramRepositoryTrait: Send + Sync {
    /// Creates a new program.
    async fn create(&self, new_program: NewProgram) -> Result<Program>;

    /// Retrieves a program by its ID.
    fn get_by_id(&self, program_id: &str) -> Result<Program>;

    /// Lists programs, optionally filtering to active ones.
    fn list(&self, active_only: bool) -> Result<Vec<Program>>;
}

/// Trait defining the contract for Program service operations.
#[async_trait]
pub trait ProgramServiceTrait: Send + Sync {
    /// Creates a new program with validation.
    async fn create_program(&self, new_program: NewProgram) -> Result<Program>;

    /// Retrieves a program by ID.
    fn get_program(&self, program_id: &str) -> Result<Program>;

    /// Lists programs, optionally filtering to active ones.
    fn list_programs(&self, active_only: bool) -> Result<Vec<Program>>;
}
