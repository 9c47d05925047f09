//! Todo API module
//!
//! | Path | Method | Handler |
//! |------|--------|---------|
//! | /api/todos | GET | list (`?priority=`, `?sort=`) |
//! | /api/todos | POST | create |
//! | /api/todos/stats | GET | stats |
//! | /api/todos/overdue | GET | overdue |
//! | /api/todos/{id} | GET, PUT, DELETE | get_by_id, update, delete |
//! | /api/todos/{id}/priority | PATCH | set_priority |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/todos", routes())
}

fn routes() -> Router<ServerState> {
    // Static segments take precedence over `{id}`
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/stats", get(handler::stats))
        .route("/overdue", get(handler::overdue))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/priority", patch(handler::set_priority))
}
