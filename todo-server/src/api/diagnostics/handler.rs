//! Diagnostics Handlers

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::Serialize;
use shared::models::{Patch, Priority, Todo, TodoCreate, TodoUpdate};

use crate::core::ServerState;
use crate::db::repository::{RepoError, TodoRepository, set_priority};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// Title marker of every todo the diagnostics create; `cleanup` removes them
pub const TEST_TITLE: &str = "Test todo";

/// How many todos `read` returns
const READ_LIMIT: usize = 10;

fn test_title(kind: &str) -> String {
    format!("{TEST_TITLE}{kind} - {}", Utc::now().to_rfc3339())
}

#[derive(Debug, Serialize)]
pub struct ConnectionReport {
    connected: bool,
    endpoint: String,
    namespace: String,
    database: String,
}

#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    success: bool,
    message: &'static str,
    connection: ConnectionReport,
}

/// Outcome of one self-check step
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub step: &'static str,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Todo>,
}

impl StepResult {
    fn passed(step: &'static str, data: Option<Todo>) -> Self {
        Self {
            step,
            success: true,
            error: None,
            data,
        }
    }

    fn failed(step: &'static str, err: RepoError, expose: bool) -> Self {
        tracing::warn!(step, error = %err, "Self-check step failed");
        let error = if expose {
            err.to_string()
        } else {
            AppError::from(err).message
        };
        Self {
            step,
            success: false,
            error: Some(error),
            data: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Summary {
    total: usize,
    passed: usize,
    failed: usize,
}

#[derive(Debug, Serialize)]
pub struct SelfCheckResponse {
    success: bool,
    message: &'static str,
    results: Vec<StepResult>,
    summary: Summary,
}

/// GET /api/test/connection
pub async fn connection(State(state): State<ServerState>) -> Json<ConnectionResponse> {
    let info = state.db.info();
    Json(ConnectionResponse {
        success: true,
        message: "Database connection status",
        connection: ConnectionReport {
            connected: state.db.is_connected().await,
            endpoint: info.target.clone(),
            namespace: info.namespace.clone(),
            database: info.database.clone(),
        },
    })
}

/// GET /api/test/full - 200 when every step passed, 500 otherwise
pub async fn full(State(state): State<ServerState>) -> (StatusCode, Json<SelfCheckResponse>) {
    let results = run_self_check(&state.todos, state.config.is_development()).await;

    let passed = results.iter().filter(|r| r.success).count();
    let summary = Summary {
        total: results.len(),
        passed,
        failed: results.len() - passed,
    };
    let success = summary.failed == 0;

    let (status, message) = if success {
        (StatusCode::OK, "All self-check steps passed")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Self-check failed")
    };

    (
        status,
        Json(SelfCheckResponse {
            success,
            message,
            results,
            summary,
        }),
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResponse {
    success: bool,
    message: &'static str,
    total_count: u64,
    data: Vec<Todo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    success: bool,
    message: &'static str,
    deleted_count: usize,
}

/// POST /api/test/create - store one marked todo
pub async fn create(
    State(state): State<ServerState>,
) -> AppResult<(StatusCode, Json<ApiResponse<Todo>>)> {
    let input = TodoCreate::new(test_title(""))
        .with_description("Created by the diagnostics create test")
        .with_priority(Priority::Medium.as_str());
    let todo = state.todos.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(todo, "Create test passed")),
    ))
}

/// GET /api/test/read - newest todos plus the total count
pub async fn read(State(state): State<ServerState>) -> AppResult<Json<ReadResponse>> {
    let data = state.todos.latest(READ_LIMIT).await?;
    let total_count = state.todos.count().await?;
    Ok(Json(ReadResponse {
        success: true,
        message: "Read test passed",
        total_count,
        data,
    }))
}

/// PUT /api/test/update - mark the newest todo as updated
pub async fn update(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Todo>>> {
    let Some(latest) = state.todos.latest(1).await?.into_iter().next() else {
        return Err(AppError::with_message(
            ErrorCode::NotFound,
            "No todo to update, run the create test first",
        ));
    };

    let change = TodoUpdate {
        title: Patch::Value(format!("{} (updated)", latest.title)),
        ..Default::default()
    };
    let todo = state.todos.update(&latest.id, change).await?;
    Ok(Json(ApiResponse::ok_with_message(todo, "Update test passed")))
}

/// DELETE /api/test/delete - remove the oldest todo
pub async fn delete(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Todo>>> {
    let Some(oldest) = state.todos.oldest().await? else {
        return Err(AppError::with_message(
            ErrorCode::NotFound,
            "No todo to delete",
        ));
    };

    let todo = state.todos.delete(&oldest.id).await?;
    Ok(Json(ApiResponse::ok_with_message(todo, "Delete test passed")))
}

/// DELETE /api/test/cleanup - remove every todo the diagnostics created
pub async fn cleanup(State(state): State<ServerState>) -> AppResult<Json<CleanupResponse>> {
    let deleted_count = state.todos.delete_where_title_contains(TEST_TITLE).await?;
    Ok(Json(CleanupResponse {
        success: true,
        message: "Test data removed",
        deleted_count,
    }))
}

/// Create, read, update and delete a test todo
///
/// Delete runs whenever create succeeded, so the test todo never outlives the
/// check. `expose` puts internal error text into failed steps.
pub async fn run_self_check(repo: &TodoRepository, expose: bool) -> Vec<StepResult> {
    let mut results = Vec::with_capacity(5);

    let sample = TodoCreate::new(test_title(" (self-check)"))
        .with_description("Created by the store self-check")
        .with_tags(["self-check"]);
    let created = match repo.create(sample).await {
        Ok(todo) => {
            results.push(StepResult::passed("create", Some(todo.clone())));
            todo
        }
        Err(e) => {
            results.push(StepResult::failed("create", e, expose));
            return results;
        }
    };

    results.push(match repo.find_by_id(&created.id).await {
        Ok(todo) => StepResult::passed("read", Some(todo)),
        Err(e) => StepResult::failed("read", e, expose),
    });

    results.push(
        match set_priority(repo, &created.id, Priority::High.as_str()).await {
            Ok(todo) if todo.priority == Priority::High => StepResult::passed("update", Some(todo)),
            Ok(_) => StepResult::failed(
                "update",
                RepoError::Database("priority not persisted".into()),
                expose,
            ),
            Err(e) => StepResult::failed("update", e, expose),
        },
    );

    results.push(match repo.delete(&created.id).await {
        Ok(todo) => StepResult::passed("delete", Some(todo)),
        Err(e) => StepResult::failed("delete", e, expose),
    });

    results.push(match repo.find_by_id(&created.id).await {
        Err(RepoError::NotFound(_)) => StepResult::passed("verify-delete", None),
        Ok(_) => StepResult::failed(
            "verify-delete",
            RepoError::Database("test todo still present after delete".into()),
            expose,
        ),
        Err(e) => StepResult::failed("verify-delete", e, expose),
    });

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::db::repository::{TodoFilter, TodoSort};

    #[tokio::test]
    async fn test_self_check_passes_and_cleans_up() {
        let db = Database::in_memory().await.unwrap();
        let repo = TodoRepository::new(db.client().clone());

        let results = run_self_check(&repo, true).await;
        let steps: Vec<_> = results.iter().map(|r| r.step).collect();
        assert_eq!(steps, ["create", "read", "update", "delete", "verify-delete"]);
        assert!(results.iter().all(|r| r.success), "{results:?}");

        let remaining = repo
            .list(&TodoFilter::default(), TodoSort::default())
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_titles_carry_marker() {
        assert!(test_title("").starts_with("Test todo - "));
        assert!(test_title(" (self-check)").contains(TEST_TITLE));
    }
}
