//! Todo Repository

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use shared::models::{Priority, Todo, TodoCreate, TodoStats, TodoUpdate, is_overdue};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use thiserror::Error;
use uuid::Uuid;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{TodoDraft, TodoRecord};

const TABLE: &str = "todo";

/// Well-formed todo id: 32 lowercase hex characters
pub fn is_valid_id(id: &str) -> bool {
    id.len() == 32 && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn ensure_valid_id(id: &str) -> RepoResult<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(RepoError::InvalidId(id.to_string()))
    }
}

/// `updatedAt` for a write happening at `now`; always after `previous`
fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Fields a list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    DueDate,
    Title,
    /// Rank order, `low < medium < high`
    Priority,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::DueDate => "dueDate",
            SortField::Title => "title",
            SortField::Priority => "priority",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            "dueDate" => Some(SortField::DueDate),
            "title" => Some(SortField::Title),
            "priority" => Some(SortField::Priority),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported sort field '{0}'")]
pub struct UnknownSortField(pub String);

/// Sort order, written `field` (ascending) or `-field` (descending)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoSort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for TodoSort {
    /// Newest first
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            descending: true,
        }
    }
}

impl FromStr for TodoSort {
    type Err = UnknownSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let field = SortField::from_name(name).ok_or_else(|| UnknownSortField(name.to_string()))?;
        Ok(Self { field, descending })
    }
}

impl TodoSort {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn compare(&self, a: &TodoRecord, b: &TodoRecord) -> Ordering {
        // `None < Some(_)`: todos without a due date come first when ascending
        let ordering = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::DueDate => a.due_date.cmp(&b.due_date),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Priority => a.priority.cmp(&b.priority),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Stable: ties keep their input order
    pub fn apply(&self, records: &mut [TodoRecord]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

// =============================================================================
// Statistics
// =============================================================================

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct StatRow {
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    due_date: Option<DateTime<Utc>>,
}

/// Count todos, overdue todos and todos per priority
///
/// `by_priority` only has keys for priorities that occur.
pub fn aggregate_stats<I>(rows: I, now: DateTime<Utc>) -> TodoStats
where
    I: IntoIterator<Item = (Priority, Option<DateTime<Utc>>)>,
{
    let mut stats = TodoStats::default();
    for (priority, due_date) in rows {
        stats.total += 1;
        if is_overdue(due_date, now) {
            stats.overdue += 1;
        }
        *stats
            .by_priority
            .entry(priority.as_str().to_string())
            .or_insert(0) += 1;
    }
    stats
}

// =============================================================================
// Repository
// =============================================================================

/// List filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    /// Exact match; a value outside the enum matches nothing
    pub priority: Option<String>,
}

fn into_todos(records: Vec<TodoRecord>, now: DateTime<Utc>) -> RepoResult<Vec<Todo>> {
    records.into_iter().map(|r| r.into_todo(now)).collect()
}

#[derive(Debug, Clone)]
pub struct TodoRepository {
    base: BaseRepository,
}

impl TodoRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn find_records(&self, filter: &TodoFilter) -> RepoResult<Vec<TodoRecord>> {
        let records: Vec<TodoRecord> = match &filter.priority {
            Some(priority) => self
                .base
                .db()
                .query("SELECT * FROM todo WHERE priority = $priority")
                .bind(("priority", priority.clone()))
                .await?
                .take(0)?,
            None => self.base.db().select(TABLE).await?,
        };
        Ok(records)
    }

    async fn fetch(&self, id: &str) -> RepoResult<TodoRecord> {
        ensure_valid_id(id)?;
        let record: Option<TodoRecord> = self.base.db().select((TABLE, id)).await?;
        record.ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    /// Find todos matching `filter`, ordered by `sort`
    pub async fn list(&self, filter: &TodoFilter, sort: TodoSort) -> RepoResult<Vec<Todo>> {
        let mut records = self.find_records(filter).await?;
        sort.apply(&mut records);
        into_todos(records, Utc::now())
    }

    /// Find todos with the given priority, newest first
    pub async fn find_by_priority(&self, priority: Priority) -> RepoResult<Vec<Todo>> {
        let filter = TodoFilter {
            priority: Some(priority.as_str().to_string()),
        };
        self.list(&filter, TodoSort::default()).await
    }

    /// Find todos due before `now`, earliest due date first
    pub async fn find_overdue(&self, now: DateTime<Utc>) -> RepoResult<Vec<Todo>> {
        let mut records: Vec<TodoRecord> = self
            .find_records(&TodoFilter::default())
            .await?
            .into_iter()
            .filter(|r| is_overdue(r.due_date, now))
            .collect();
        TodoSort::ascending(SortField::DueDate).apply(&mut records);
        into_todos(records, now)
    }

    /// Find todo by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Todo> {
        self.fetch(id).await?.into_todo(Utc::now())
    }

    /// Create a new todo
    pub async fn create(&self, input: TodoCreate) -> RepoResult<Todo> {
        let draft = TodoDraft::from_create(input);
        draft.check(Vec::new())?;

        let now = Utc::now();
        let record = draft.into_record(now, now)?;
        let key = Uuid::new_v4().simple().to_string();

        let created: Option<TodoRecord> = self
            .base
            .db()
            .create((TABLE, key.as_str()))
            .content(record)
            .await?;
        let todo = created
            .ok_or_else(|| RepoError::Database("Failed to create todo".to_string()))?
            .into_todo(now)?;

        tracing::info!(todo_id = %todo.id, title = %todo.title, "Todo created");
        Ok(todo)
    }

    /// Update a todo; omitted fields keep their value
    pub async fn update(&self, id: &str, data: TodoUpdate) -> RepoResult<Todo> {
        let existing = self.fetch(id).await?;

        let mut draft = TodoDraft::from_record(&existing);
        let errors = draft.apply(data);
        draft.check(errors)?;

        let now = Utc::now();
        let record =
            draft.into_record(existing.created_at, next_timestamp(existing.updated_at, now))?;

        let updated: Option<TodoRecord> = self
            .base
            .db()
            .update((TABLE, id))
            .content(record)
            .await?;
        updated
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?
            .into_todo(now)
    }

    /// Hard delete a todo, returning its last state
    pub async fn delete(&self, id: &str) -> RepoResult<Todo> {
        ensure_valid_id(id)?;
        let deleted: Option<TodoRecord> = self.base.db().delete((TABLE, id)).await?;
        let todo = deleted
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?
            .into_todo(Utc::now())?;

        tracing::info!(todo_id = %todo.id, title = %todo.title, "Todo deleted");
        Ok(todo)
    }

    /// Aggregate statistics over all todos
    pub async fn stats(&self) -> RepoResult<TodoStats> {
        let rows: Vec<StatRow> = self
            .base
            .db()
            .query("SELECT priority, due_date FROM todo")
            .await?
            .take(0)?;
        Ok(aggregate_stats(
            rows.into_iter().map(|r| (r.priority, r.due_date)),
            Utc::now(),
        ))
    }

    /// Number of stored todos
    pub async fn count(&self) -> RepoResult<u64> {
        let row: Option<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS total FROM todo GROUP ALL")
            .await?
            .take(0)?;
        Ok(row.map_or(0, |r| r.total))
    }

    /// Most recently created todos, at most `limit`
    pub async fn latest(&self, limit: usize) -> RepoResult<Vec<Todo>> {
        let mut todos = self.list(&TodoFilter::default(), TodoSort::default()).await?;
        todos.truncate(limit);
        Ok(todos)
    }

    /// The todo created first, if any
    pub async fn oldest(&self) -> RepoResult<Option<Todo>> {
        let todos = self
            .list(&TodoFilter::default(), TodoSort::ascending(SortField::CreatedAt))
            .await?;
        Ok(todos.into_iter().next())
    }

    /// Delete every todo whose title contains `fragment`, returning how many went
    pub async fn delete_where_title_contains(&self, fragment: &str) -> RepoResult<usize> {
        let keys: Vec<String> = self
            .find_records(&TodoFilter::default())
            .await?
            .iter()
            .filter(|r| r.title.contains(fragment))
            .filter_map(TodoRecord::key)
            .collect();

        let mut deleted = 0;
        for key in &keys {
            let removed: Option<TodoRecord> = self.base.db().delete((TABLE, key.as_str())).await?;
            if removed.is_some() {
                deleted += 1;
            }
        }

        tracing::info!(fragment, deleted, "Todos deleted by title");
        Ok(deleted)
    }
}

/// Change only the priority of a todo
pub async fn set_priority(repo: &TodoRepository, id: &str, priority: &str) -> RepoResult<Todo> {
    repo.update(id, TodoUpdate::priority(priority)).await
}
