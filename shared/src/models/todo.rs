//! Todo Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::Patch;

/// Todo priority
///
/// Declaration order is rank order: `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is not one of `low`, `medium`, `high`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority '{0}'")]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(UnknownPriority(other.to_string())),
        }
    }
}

/// A stored todo, as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Derived when the todo is read, never stored
    #[serde(default)]
    pub is_overdue: bool,
}

impl Todo {
    /// True iff a due date is set and lies strictly before `now`
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        is_overdue(self.due_date, now)
    }
}

/// Overdue rule shared by records, views and statistics
pub fn is_overdue(due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    due_date.is_some_and(|due| due < now)
}

/// Todo for creation (body of `POST /api/todos`)
///
/// `priority` stays a string here so that a value outside the enum reaches
/// validation and is reported per field instead of failing decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TodoCreate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// Todo for update (body of `PUT /api/todos/:id`)
///
/// Omitted fields are left unchanged; `null` clears a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub title: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub description: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub priority: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub due_date: Patch<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub tags: Patch<Vec<String>>,
}

impl TodoUpdate {
    /// An update that only changes the priority
    pub fn priority(priority: impl Into<String>) -> Self {
        Self {
            priority: Patch::Value(priority.into()),
            ..Default::default()
        }
    }

    /// True if no field is touched
    pub fn is_empty(&self) -> bool {
        self.title.is_missing()
            && self.description.is_missing()
            && self.priority.is_missing()
            && self.due_date.is_missing()
            && self.tags.is_missing()
    }
}

/// Body of `PATCH /api/todos/:id/priority`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityChange {
    pub priority: String,
}

/// Query string of `GET /api/todos`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoQuery {
    /// Exact-match priority filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// `field` or `-field`, default `-createdAt`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// Aggregate statistics over all todos
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total: u64,
    pub overdue: u64,
    /// Count per priority value present in the store
    pub by_priority: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(due_date: Option<DateTime<Utc>>) -> Todo {
        let now = Utc::now();
        Todo {
            id: "0123456789abcdef0123456789abcdef".to_string(),
            title: "Write report".to_string(),
            description: String::new(),
            priority: Priority::High,
            due_date,
            tags: vec!["work".to_string()],
            created_at: now,
            updated_at: now,
            is_overdue: false,
        }
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(
            "urgent".parse::<Priority>(),
            Err(UnknownPriority("urgent".to_string()))
        );
        assert!("High".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_serde() {
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), r#""low""#);
        assert!(serde_json::from_str::<Priority>(r#""urgent""#).is_err());
    }

    #[test]
    fn test_overdue_is_strict() {
        let now = Utc::now();
        assert!(!is_overdue(None, now));
        assert!(!is_overdue(Some(now), now));
        assert!(is_overdue(Some(now - Duration::seconds(1)), now));
        assert!(!is_overdue(Some(now + Duration::days(1)), now));
    }

    #[test]
    fn test_todo_wire_names() {
        let todo = sample(Some(Utc::now() - Duration::days(1)));
        let json = serde_json::to_value(&todo).unwrap();
        for key in ["id", "dueDate", "createdAt", "updatedAt", "isOverdue", "tags"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(todo.is_overdue_at(Utc::now()));
    }

    #[test]
    fn test_create_body_accepts_minimal_input() {
        let body: TodoCreate = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert_eq!(body, TodoCreate::new("Buy milk"));

        let body: TodoCreate =
            serde_json::from_str(r#"{"title":"x","priority":"urgent","dueDate":null}"#).unwrap();
        assert_eq!(body.priority.as_deref(), Some("urgent"));
        assert!(body.due_date.is_none());
    }

    #[test]
    fn test_update_body_distinguishes_null() {
        let body: TodoUpdate = serde_json::from_str(r#"{"dueDate":null,"priority":"high"}"#).unwrap();
        assert!(body.due_date.is_null());
        assert!(body.title.is_missing());
        assert_eq!(body.priority, Patch::Value("high".to_string()));
        assert!(!body.is_empty());
        assert!(TodoUpdate::default().is_empty());
    }

    #[test]
    fn test_update_serialize_only_touched_fields() {
        let json = serde_json::to_string(&TodoUpdate::priority("low")).unwrap();
        assert_eq!(json, r#"{"priority":"low"}"#);
    }

    #[test]
    fn test_stats_wire_names() {
        let mut stats = TodoStats {
            total: 2,
            overdue: 1,
            ..Default::default()
        };
        stats.by_priority.insert("high".to_string(), 2);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["byPriority"]["high"], 2);
    }
}
