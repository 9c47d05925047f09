//! Repository Module
//!
//! CRUD operations over SurrealDB tables.

pub mod todo;

pub use todo::{SortField, TodoFilter, TodoRepository, TodoSort, UnknownSortField, set_priority};

use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID convention
// =============================================================================
//
// Public ids are the bare record key: 32 lowercase hex characters generated
// on create. Handlers never see the `todo:` table prefix. Anything that is
// not a well-formed key is rejected with `InvalidId` before touching the db.

/// Base repository with database reference
#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Surreal<Any>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Any> {
        &self.db
    }
}
