//! Todo Client - HTTP client for the Todo API
//!
//! [`HttpClient`] wraps every route with a typed method. [`smoke`] holds the
//! end-to-end scenarios run by the `todo-smoke` binary against a live server.

pub mod config;
pub mod error;
pub mod http;
pub mod smoke;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HealthStatus, HttpClient};

// Re-export shared types for convenience
pub use shared::{ApiResponse, Priority, Todo, TodoCreate, TodoQuery, TodoStats, TodoUpdate};
