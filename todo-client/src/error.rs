//! Client error types

use reqwest::StatusCode;
use shared::ErrorBody;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Origin rejected by the server's CORS policy
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error, one message per violated field
    #[error("Validation error: {message}")]
    Validation { message: String, errors: Vec<String> },

    /// Server-side failure
    #[error("Internal error ({status}): {message}")]
    Internal { status: StatusCode, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Map a failed response onto an error
    ///
    /// The body is decoded as the server's error envelope when possible,
    /// otherwise the raw text is kept.
    pub fn from_response(status: StatusCode, text: &str) -> Self {
        let (message, errors) = match serde_json::from_str::<ErrorBody>(text) {
            Ok(body) => (body.message, body.errors),
            Err(_) => (text.to_string(), Vec::new()),
        };
        match status {
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation { message, errors }
            }
            _ => ClientError::Internal { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation { .. })
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_decodes_envelope() {
        let err = ClientError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"code":2,"message":"Invalid input","errors":["priority must be one of low, medium, high"]}"#,
        );
        match err {
            ClientError::Validation { message, errors } => {
                assert_eq!(message, "Invalid input");
                assert_eq!(errors.len(), 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_from_response_keeps_raw_text() {
        let err = ClientError::from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(
            err,
            ClientError::Internal { status: StatusCode::BAD_GATEWAY, ref message } if message == "upstream down"
        ));
    }

    #[test]
    fn test_not_found() {
        let err = ClientError::from_response(
            StatusCode::NOT_FOUND,
            r#"{"success":false,"message":"Todo not found"}"#,
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: Todo not found");
    }
}
