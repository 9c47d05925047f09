//! API Response types
//!
//! Every successful response uses the same envelope:
//! ```json
//! {
//!     "success": true,
//!     "message": "Todo created",
//!     "count": 3,
//!     "data": { ... }
//! }
//! ```
//! `message` and `count` are only present where the endpoint defines them.

use serde::{Deserialize, Serialize};

/// Unified success envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always true for this envelope
    pub success: bool,
    /// Human-readable message (mutations only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of items in `data` (collections only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Response data
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
        }
    }

    /// Create a successful response with custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data: Some(data),
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Create a collection response, `count` is the number of items
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            count: Some(items.len()),
            data: Some(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_shape() {
        let json = serde_json::to_value(ApiResponse::ok(42)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 42}));
    }

    #[test]
    fn test_ok_with_message_shape() {
        let json = serde_json::to_value(ApiResponse::ok_with_message("x", "Todo created")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "message": "Todo created", "data": "x"})
        );
    }

    #[test]
    fn test_list_counts_items() {
        let response = ApiResponse::list(vec!["a", "b", "c"]);
        assert_eq!(response.count, Some(3));

        let empty = ApiResponse::<Vec<u8>>::list(Vec::new());
        let json = serde_json::to_value(empty).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "count": 0, "data": []})
        );
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let response: ApiResponse<u32> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(response.success);
        assert!(response.data.is_none());
    }
}
