//! Input validation helpers
//!
//! Field rules live on the draft types as `validator` attributes. This module
//! holds the custom rules and flattens a report into per-field messages.

use std::borrow::Cow;

use shared::models::Priority;
use validator::{ValidationError, ValidationErrors};

/// Allowed priority values
pub fn validate_priority(value: &str) -> Result<(), ValidationError> {
    if value.parse::<Priority>().is_ok() {
        return Ok(());
    }
    Err(ValidationError::new("priority").with_message(Cow::Owned(format!(
        "priority must be one of low, medium, high (got '{value}')"
    ))))
}

/// One message per violation, ordered by field name
pub fn field_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| field.to_string());

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect()
}

/// Trim tags and drop the empty ones
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
