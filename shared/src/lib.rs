//! Shared types for the Todo service
//!
//! Wire types used by both `todo-server` and `todo-client`:
//! the Todo models, the unified error type and the response envelope.

pub mod error;
pub mod models;
pub mod response;

// Re-exports
pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
pub use models::{
    Patch, Priority, PriorityChange, Todo, TodoCreate, TodoQuery, TodoStats, TodoUpdate,
};
pub use response::ApiResponse;
