//! Health and banner routes
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | / | GET | service banner |
//! | /health | GET | liveness and database state |
//! | /favicon.ico | GET | 204, keeps browser noise out of the logs |

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .route("/favicon.ico", get(favicon))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Connected,
    Disconnected,
}

impl DatabaseStatus {
    async fn check(state: &ServerState) -> Self {
        if state.db.is_connected().await {
            DatabaseStatus::Connected
        } else {
            DatabaseStatus::Disconnected
        }
    }
}

#[derive(Serialize)]
pub struct BannerResponse {
    message: &'static str,
    version: &'static str,
    status: &'static str,
    database: DatabaseStatus,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    database: DatabaseStatus,
}

async fn banner(State(state): State<ServerState>) -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Todo Backend API Server",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        database: DatabaseStatus::check(&state).await,
    })
}

/// Always 200 while the process serves requests
async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        database: DatabaseStatus::check(&state).await,
    })
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
