//! Todo Model
//!
//! [`TodoRecord`] is the stored shape. [`TodoDraft`] is the validated field
//! set a record is built from, shared by create and update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{Patch, Priority, Todo, TodoCreate, TodoUpdate, is_overdue};
use surrealdb::RecordId;
use validator::Validate;

use crate::db::repository::{RepoError, RepoResult};
use crate::utils::validation::{field_messages, normalize_tags, validate_priority};

/// Todo record matching the `todo` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoRecord {
    /// Public id: the record key without table or escaping
    pub fn key(&self) -> Option<String> {
        self.id.as_ref().map(record_key)
    }

    /// API view, with `is_overdue` derived at `now`
    pub fn into_todo(self, now: DateTime<Utc>) -> RepoResult<Todo> {
        let id = self
            .key()
            .ok_or_else(|| RepoError::Database("todo record without id".into()))?;
        Ok(Todo {
            id,
            is_overdue: is_overdue(self.due_date, now),
            title: self.title,
            description: self.description,
            priority: self.priority,
            due_date: self.due_date,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Key part of a record id, e.g. `todo:⟨abc⟩` gives `abc`
pub fn record_key(id: &RecordId) -> String {
    id.key()
        .to_string()
        .trim_matches(|c| matches!(c, '⟨' | '⟩' | '`'))
        .to_string()
}

/// Field set of a todo before it is stored
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct TodoDraft {
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: String,
    #[validate(custom(function = "validate_priority"))]
    pub priority: String,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl TodoDraft {
    /// Draft from a create body; omitted fields take their defaults
    pub fn from_create(input: TodoCreate) -> Self {
        Self {
            title: input.title.unwrap_or_default().trim().to_string(),
            description: input.description.unwrap_or_default().trim().to_string(),
            priority: input
                .priority
                .unwrap_or_else(|| Priority::default().as_str().to_string()),
            due_date: input.due_date,
            tags: normalize_tags(input.tags.unwrap_or_default()),
        }
    }

    /// Draft holding the current values of a stored record
    pub fn from_record(record: &TodoRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            priority: record.priority.as_str().to_string(),
            due_date: record.due_date,
            tags: record.tags.clone(),
        }
    }

    /// Apply an update body
    ///
    /// `null` clears `dueDate`, empties `description` and `tags`, and is
    /// rejected for `title` and `priority`. Returned messages are merged with
    /// the field rules by [`TodoDraft::check`].
    pub fn apply(&mut self, update: TodoUpdate) -> Vec<String> {
        let mut errors = Vec::new();

        match update.title {
            Patch::Missing => {}
            Patch::Null => errors.push("title is required".to_string()),
            Patch::Value(title) => self.title = title.trim().to_string(),
        }
        match update.description {
            Patch::Missing => {}
            Patch::Null => self.description.clear(),
            Patch::Value(description) => self.description = description.trim().to_string(),
        }
        match update.priority {
            Patch::Missing => {}
            Patch::Null => errors.push("priority must be one of low, medium, high".to_string()),
            Patch::Value(priority) => self.priority = priority,
        }
        match update.due_date {
            Patch::Missing => {}
            Patch::Null => self.due_date = None,
            Patch::Value(due) => self.due_date = Some(due),
        }
        match update.tags {
            Patch::Missing => {}
            Patch::Null => self.tags.clear(),
            Patch::Value(tags) => self.tags = normalize_tags(tags),
        }

        errors
    }

    /// Run the field rules, adding any earlier messages
    pub fn check(&self, mut errors: Vec<String>) -> RepoResult<()> {
        if let Err(report) = self.validate() {
            errors.extend(field_messages(&report));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RepoError::Validation(errors))
        }
    }

    /// Build the record to store; call [`TodoDraft::check`] first
    pub fn into_record(
        self,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<TodoRecord> {
        let priority = self
            .priority
            .parse::<Priority>()
            .map_err(|e| RepoError::Validation(vec![e.to_string()]))?;
        Ok(TodoRecord {
            id: None,
            title: self.title,
            description: self.description,
            priority,
            due_date: self.due_date,
            tags: self.tags,
            created_at,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn stored() -> TodoRecord {
        let now = Utc::now();
        TodoRecord {
            id: Some(RecordId::from_table_key("todo", "0123456789abcdef0123456789abcdef")),
            title: "Write report".into(),
            description: "quarterly".into(),
            priority: Priority::High,
            due_date: Some(now + Duration::days(1)),
            tags: vec!["work".into()],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_record_key() {
        let record = stored();
        assert_eq!(record.key().as_deref(), Some("0123456789abcdef0123456789abcdef"));
    }

    #[test]
    fn test_into_todo_derives_overdue() {
        let mut record = stored();
        let now = Utc::now();
        record.due_date = Some(now - Duration::hours(1));
        let todo = record.into_todo(now).unwrap();
        assert!(todo.is_overdue);
        assert_eq!(todo.id, "0123456789abcdef0123456789abcdef");
    }

    #[test]
    fn test_into_todo_requires_id() {
        let mut record = stored();
        record.id = None;
        assert!(matches!(record.into_todo(Utc::now()), Err(RepoError::Database(_))));
    }

    #[test]
    fn test_create_defaults_and_trim() {
        let draft = TodoDraft::from_create(
            TodoCreate::new("  Buy milk  ").with_tags(["  shop ", "", " "]),
        );
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.description, "");
        assert_eq!(draft.priority, "medium");
        assert_eq!(draft.tags, vec!["shop"]);
        assert!(draft.check(Vec::new()).is_ok());
    }

    #[test]
    fn test_check_reports_each_field() {
        let draft = TodoDraft::from_create(
            TodoCreate::new("x".repeat(201))
                .with_description("d".repeat(1001))
                .with_priority("urgent"),
        );
        match draft.check(Vec::new()) {
            Err(RepoError::Validation(errors)) => {
                assert_eq!(errors.len(), 3);
                assert!(errors[0].starts_with("description"));
                assert!(errors[1].starts_with("priority"));
                assert!(errors[2].starts_with("title"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_length_limits_count_characters() {
        let draft = TodoDraft::from_create(TodoCreate::new("é".repeat(200)));
        assert!(draft.check(Vec::new()).is_ok());
    }

    #[test]
    fn test_apply_null_semantics() {
        let mut draft = TodoDraft::from_record(&stored());
        let update: TodoUpdate =
            serde_json::from_str(r#"{"dueDate":null,"description":null,"tags":null}"#).unwrap();
        let errors = draft.apply(update);
        assert!(errors.is_empty());
        assert!(draft.due_date.is_none());
        assert_eq!(draft.description, "");
        assert!(draft.tags.is_empty());
        assert_eq!(draft.title, "Write report");
    }

    #[test]
    fn test_apply_null_title_rejected() {
        let mut draft = TodoDraft::from_record(&stored());
        let update: TodoUpdate = serde_json::from_str(r#"{"title":null}"#).unwrap();
        let errors = draft.apply(update);
        assert!(matches!(draft.check(errors), Err(RepoError::Validation(e)) if e.len() == 1));
    }

    #[test]
    fn test_into_record() {
        let now = Utc::now();
        let record = TodoDraft::from_create(TodoCreate::new("a").with_priority("low"))
            .into_record(now, now)
            .unwrap();
        assert_eq!(record.priority, Priority::Low);
        assert!(record.id.is_none());
    }
}
