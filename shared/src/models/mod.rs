//! Data models
//!
//! Shared between todo-server and todo-client (via API).

pub mod patch;
pub mod todo;

// Re-exports
pub use patch::Patch;
pub use todo::*;
