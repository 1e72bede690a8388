//! SQLite storage implementation for the Seva donation platform.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in `seva-core`
//! and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. The `core` crate is database-agnostic and works with traits.
//!
//! All writes are serialized through a single-writer actor that wraps each
//! job in an immediate transaction; reads go straight to the pool.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod donations;
pub mod donors;
pub mod programs;
pub mod settings;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from seva-core for convenience
pub use seva_core::errors::{DatabaseError, Error, Result};
