//! Store diagnostics
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/test/connection | GET | where the session points and whether it answers |
//! | /api/test/create | POST | store one marked test todo |
//! | /api/test/read | GET | newest 10 todos and the total count |
//! | /api/test/update | PUT | append " (updated)" to the newest todo's title |
//! | /api/test/delete | DELETE | remove the oldest todo |
//! | /api/test/cleanup | DELETE | remove every marked test todo |
//! | /api/test/full | GET | create, read, update, delete self-check |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub use handler::{StepResult, TEST_TITLE, run_self_check};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/test", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/connection", get(handler::connection))
        .route("/create", post(handler::create))
        .route("/read", get(handler::read))
        .route("/update", put(handler::update))
        .route("/delete", delete(handler::delete))
        .route("/cleanup", delete(handler::cleanup))
        .route("/full", get(handler::full))
}
