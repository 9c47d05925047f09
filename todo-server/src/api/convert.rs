//! Error conversion
//!
//! Maps repository errors onto the API error type.

use shared::AppError;

use crate::db::repository::{RepoError, UnknownSortField};

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(id) => AppError::todo_not_found(&id),
            RepoError::InvalidId(id) => AppError::invalid_todo_id(&id),
            RepoError::Validation(errors) => AppError::validation(errors),
            RepoError::Database(detail) => AppError::database(detail),
        }
    }
}

impl From<UnknownSortField> for AppError {
    fn from(err: UnknownSortField) -> Self {
        AppError::invalid_sort_field(&err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn test_repo_error_mapping() {
        let not_found = AppError::from(RepoError::NotFound("abc".into()));
        assert_eq!(not_found.code, ErrorCode::TodoNotFound);

        let invalid = AppError::from(RepoError::InvalidId("xyz".into()));
        assert_eq!(invalid.code, ErrorCode::InvalidTodoId);
        assert_eq!(invalid.message, not_found.message);

        let validation = AppError::from(RepoError::Validation(vec!["title is required".into()]));
        assert_eq!(validation.errors, vec!["title is required".to_string()]);

        let db = AppError::from(RepoError::Database("socket closed".into()));
        assert_eq!(db.code, ErrorCode::DatabaseError);
        assert_eq!(db.detail.as_deref(), Some("socket closed"));
    }
}
