//! API routes
//!
//! # Structure
//!
//! - [`health`] - banner, health check, favicon
//! - [`todos`] - todo CRUD, stats, overdue, priority change
//! - [`diagnostics`] - store connection and self-check
//!
//! Anything else falls through to a 404 with the requested path.

pub mod convert;
pub mod diagnostics;
pub mod extract;
pub mod health;
pub mod todos;

use std::sync::Arc;

use axum::{Json, Router, http::Uri, middleware as axum_middleware, routing::get};
use http::{HeaderName, HeaderValue};
use serde::Serialize;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::middleware::{self, CorsPolicy};
use crate::utils::AppError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

#[derive(Serialize)]
struct Endpoints {
    todos: &'static str,
    test: &'static str,
    health: &'static str,
}

#[derive(Serialize)]
struct ApiIndex {
    message: &'static str,
    version: &'static str,
    endpoints: Endpoints,
}

/// GET /api
async fn index() -> Json<ApiIndex> {
    Json(ApiIndex {
        message: "Todo API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            todos: "/api/todos",
            test: "/api/test",
            health: "/health",
        },
    })
}

/// Unmatched route or method
async fn not_found(uri: Uri) -> AppError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    AppError::route_not_found(path)
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .route("/api", get(index))
        .merge(todos::router())
        .merge(diagnostics::router())
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
}

/// Build the application with all middleware and state
///
/// Request order, outermost first: origin gate, CORS headers, request id,
/// tracing, request log, error detail, panic guard, routes.
pub fn build_app(state: ServerState) -> Router {
    let policy = Arc::new(CorsPolicy::from_config(&state.config));
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(axum_middleware::from_fn_with_state(
            state.config.environment,
            middleware::expose_error_detail,
        ))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
        .layer(policy.layer())
        .layer(axum_middleware::from_fn_with_state(
            policy,
            middleware::cors_gate,
        ))
        .with_state(state)
}
