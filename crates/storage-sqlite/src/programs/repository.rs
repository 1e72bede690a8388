use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::programs;
use crate::schema::programs::dsl::*;

use super::model::ProgramDB;
use seva_core::errors::Result;
use seva_core::programs::{NewProgram, Program, ProgramRepositoryTrait};

/// Repository for managing program data in the database
pub struct ProgramRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProgramRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ProgramRepositoryTrait for ProgramRepository {
    async fn create(&self, new_program: NewProgram) -> Result<Program> {
        self.writer
            .exec(move |conn| {
                let row: ProgramDB = new_program.into();
                diesel::insert_into(programs::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    fn get_by_id(&self, program_id: &str) -> Result<Program> {
        let mut conn = get_connection(&self.pool)?;

        let program = programs
            .select(ProgramDB::as_select())
            .find(program_id)
            .first::<ProgramDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(program.into())
    }

    fn list(&self, active_only: bool) -> Result<Vec<Program>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = programs::table.into_boxed();
        if active_only {
            query = query.filter(is_active.eq(true));
        }

        let results = query
            .select(ProgramDB::as_select())
            .order(created_at.desc())
            .load::<ProgramDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(results.into_iter().map(Program::from).collect())
    }
}
