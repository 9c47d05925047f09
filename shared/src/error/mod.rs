//! Unified error system for the Todo service
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Error type with code, message and per-field messages
//! - [`ErrorBody`]: The `{success: false, ...}` body every failed request returns
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 2xxx: Permission errors (CORS)
//! - 4xxx: Todo errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::validation(vec!["priority must be one of low, medium, high".to_string()]);
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//! assert_eq!(err.errors.len(), 1);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody, ErrorDetail};
