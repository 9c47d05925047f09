//! Error types and the error response body

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error with structured error code
///
/// This is the only error type that crosses the HTTP boundary. It carries:
/// - a standardized [`ErrorCode`] (which fixes the HTTP status)
/// - a human-readable message
/// - one message per violated field for validation failures
/// - an optional internal detail, exposed to callers only in development
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Per-field validation messages
    pub errors: Vec<String>,
    /// Requested path (unmatched routes only)
    pub path: Option<String>,
    /// Internal detail (error chain), never part of the default body
    pub detail: Option<String>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: Vec::new(),
            path: None,
            detail: None,
        }
    }

    /// Attach internal detail to this error
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error carrying one message per violated field
    pub fn validation(errors: Vec<String>) -> Self {
        let mut err = Self::new(ErrorCode::ValidationFailed);
        err.errors = errors;
        err
    }

    /// Create an error for a body that could not be decoded
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        let mut err = Self::new(ErrorCode::InvalidFormat);
        err.errors = vec![reason.into()];
        err
    }

    /// Create a not found error for a todo id
    pub fn todo_not_found(id: &str) -> Self {
        Self::new(ErrorCode::TodoNotFound).with_detail(format!("no todo with id {id}"))
    }

    /// Create a not found error for a malformed todo id
    pub fn invalid_todo_id(id: &str) -> Self {
        Self::new(ErrorCode::InvalidTodoId).with_detail(format!("malformed todo id {id:?}"))
    }

    /// Create the error for a missing or blank title
    pub fn title_required() -> Self {
        Self::new(ErrorCode::TodoTitleRequired)
    }

    /// Create the error for an unsupported sort field
    pub fn invalid_sort_field(field: &str) -> Self {
        let mut err = Self::new(ErrorCode::InvalidSortField);
        err.errors = vec![format!("sort: unsupported field '{field}'")];
        err
    }

    /// Create the error for an unmatched route
    pub fn route_not_found(path: impl Into<String>) -> Self {
        let mut err = Self::new(ErrorCode::NotFound);
        err.path = Some(path.into());
        err
    }

    /// Create the error for a rejected browser origin
    pub fn origin_not_allowed(origin: &str) -> Self {
        Self::with_message(
            ErrorCode::OriginNotAllowed,
            format!("Origin {origin} is not allowed by CORS policy"),
        )
    }

    /// Create an internal error
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError).with_detail(detail)
    }

    /// Create a database error
    pub fn database(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError).with_detail(detail)
    }
}

/// Body of every failed response
///
/// ```json
/// {
///   "success": false,
///   "code": 2,
///   "message": "Invalid input",
///   "errors": ["priority must be one of low, medium, high"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always false
    pub success: bool,
    /// Error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    /// Human-readable message
    pub message: String,
    /// Per-field validation messages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Requested path (unmatched routes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Internal detail (development only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            success: false,
            code: Some(err.code),
            message: err.message.clone(),
            errors: err.errors.clone(),
            path: err.path.clone(),
            error: None,
        }
    }
}

/// Response extension carrying the internal detail of a failed request
///
/// Inserted by [`AppError`]'s `IntoResponse` when the error has detail.
/// A server-side middleware decides whether to merge it into the body.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub body: ErrorBody,
    pub detail: String,
}

impl ErrorDetail {
    /// The body with the detail merged in
    pub fn into_body(self) -> ErrorBody {
        ErrorBody {
            error: Some(self.detail),
            ..self.body
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ErrorBody::from(&self);

        // Log system errors
        if matches!(self.code.category(), ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                detail = ?self.detail,
                "System error occurred"
            );
        }

        match self.detail {
            Some(detail) => {
                let mut response = (status, Json(body.clone())).into_response();
                response
                    .extensions_mut()
                    .insert(ErrorDetail { body, detail });
                response
            }
            None => (status, Json(body)).into_response(),
        }
    }
}
