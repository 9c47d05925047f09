//! Todo API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use shared::models::{PriorityChange, Todo, TodoCreate, TodoQuery, TodoStats, TodoUpdate};

use crate::api::extract::{JsonBody, QueryParams};
use crate::core::ServerState;
use crate::db::repository::{self, TodoFilter, TodoSort};
use crate::utils::{ApiResponse, AppError, AppResult};

/// GET /api/todos - list todos, optionally filtered and sorted
pub async fn list(
    State(state): State<ServerState>,
    QueryParams(query): QueryParams<TodoQuery>,
) -> AppResult<Json<ApiResponse<Vec<Todo>>>> {
    let sort = match query.sort.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(sort) => sort.parse::<TodoSort>()?,
        None => TodoSort::default(),
    };
    let filter = TodoFilter {
        priority: query.priority.filter(|p| !p.is_empty()),
    };
    let todos = state.todos.list(&filter, sort).await?;
    Ok(Json(ApiResponse::list(todos)))
}

/// GET /api/todos/stats - totals, overdue count and count per priority
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<TodoStats>>> {
    let stats = state.todos.stats().await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/todos/overdue - todos past their due date, earliest first
pub async fn overdue(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Todo>>>> {
    let todos = state.todos.find_overdue(Utc::now()).await?;
    Ok(Json(ApiResponse::list(todos)))
}

/// GET /api/todos/:id - get a single todo
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Todo>>> {
    let todo = state.todos.find_by_id(&id).await?;
    Ok(Json(ApiResponse::ok(todo)))
}

/// POST /api/todos - create a todo
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<TodoCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Todo>>)> {
    if payload
        .title
        .as_deref()
        .map(str::trim)
        .is_none_or(str::is_empty)
    {
        return Err(AppError::title_required());
    }

    let todo = state.todos.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(todo, "Todo created")),
    ))
}

/// PUT /api/todos/:id - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<TodoUpdate>,
) -> AppResult<Json<ApiResponse<Todo>>> {
    let todo = state.todos.update(&id, payload).await?;
    Ok(Json(ApiResponse::ok_with_message(todo, "Todo updated")))
}

/// DELETE /api/todos/:id - hard delete, returns the deleted todo
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Todo>>> {
    let todo = state.todos.delete(&id).await?;
    Ok(Json(ApiResponse::ok_with_message(todo, "Todo deleted")))
}

/// PATCH /api/todos/:id/priority - change only the priority
pub async fn set_priority(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<PriorityChange>,
) -> AppResult<Json<ApiResponse<Todo>>> {
    let todo = repository::set_priority(&state.todos, &id, &payload.priority).await?;
    Ok(Json(ApiResponse::ok_with_message(
        todo,
        "Todo priority updated",
    )))
}
