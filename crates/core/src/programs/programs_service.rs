use std::sync::Arc;

use async_trait::async_trait;

use super::programs_model::{NewProgram, Program};
use super::programs_traits::{ProgramRepositoryTrait, ProgramServiceTrait};
use crate::errors::Result;

/// Service for managing programs.
pub struct ProgramService {
    repository: Arc<dyn ProgramRepositoryTrait>,
}

impl ProgramService {
    pub fn new(repository: Arc<dyn ProgramRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ProgramServiceTrait for ProgramService {
    async fn create_program(&self, new_program: NewProgram) -> Result<Program> {
        new_program.validate()?;
        self.repository.create(new_program).await
    }

    fn get_program(&self, program_id: &str) -> Result<Program> {
        self.repository.get_by_id(program_id)
    }

    fn list_programs(&self, active_only: bool) -> Result<Vec<Program>> {
        self.repository.list(active_only)
    }
}
