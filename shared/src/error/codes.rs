//! Unified error codes for the Todo service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 4xxx: Todo errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can match on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Request body or query string does not match the expected shape
    InvalidFormat = 6,

    // ==================== 2xxx: Permission ====================
    /// Browser origin rejected by the CORS policy
    OriginNotAllowed = 2101,

    // ==================== 4xxx: Todo ====================
    /// Todo not found
    TodoNotFound = 4001,
    /// Todo id is structurally malformed
    InvalidTodoId = 4002,
    /// Todo title is missing or blank
    TodoTitleRequired = 4003,
    /// Unsupported sort field in a list query
    InvalidSortField = 4004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Invalid input",
            ErrorCode::NotFound => "Requested resource not found",
            ErrorCode::InvalidFormat => "Malformed request body or query string",

            ErrorCode::OriginNotAllowed => "Origin is not allowed by CORS policy",

            ErrorCode::TodoNotFound => "Todo not found",
            ErrorCode::InvalidTodoId => "Todo not found",
            ErrorCode::TodoTitleRequired => "Todo title is required",
            ErrorCode::InvalidSortField => "Unsupported sort field",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database operation failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Returned when a numeric code does not map to any [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            6 => Ok(ErrorCode::InvalidFormat),

            2101 => Ok(ErrorCode::OriginNotAllowed),

            4001 => Ok(ErrorCode::TodoNotFound),
            4002 => Ok(ErrorCode::InvalidTodoId),
            4003 => Ok(ErrorCode::TodoTitleRequired),
            4004 => Ok(ErrorCode::InvalidSortField),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::OriginNotAllowed.code(), 2101);
        assert_eq!(ErrorCode::TodoNotFound.code(), 4001);
        assert_eq!(ErrorCode::InvalidTodoId.code(), 4002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(4001), Ok(ErrorCode::TodoNotFound));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::DatabaseError));
        assert!(ErrorCode::try_from(0).is_err());
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
        assert_eq!(InvalidErrorCode(4999).to_string(), "invalid error code: 4999");
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::TodoTitleRequired).unwrap();
        assert_eq!(json, "4003");

        let code: ErrorCode = serde_json::from_str("4004").unwrap();
        assert_eq!(code, ErrorCode::InvalidSortField);
        assert!(serde_json::from_str::<ErrorCode>("77").is_err());
    }

    #[test]
    fn test_malformed_id_reads_like_not_found() {
        assert_eq!(
            ErrorCode::InvalidTodoId.message(),
            ErrorCode::TodoNotFound.message()
        );
    }
}
