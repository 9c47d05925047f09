//! Request logging middleware
//!
//! Every request runs inside a `request` span carrying its id, method and
//! matched route, so the start and completion events stay short.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};

/// Request logging middleware
///
/// Span fields: request id (x-request-id), method, matched route.
/// Events: origin on start; status and latency in milliseconds on completion,
/// at `warn` for 4xx/5xx.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let origin = req
        .headers()
        .get(http::header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %path,
    );

    async move {
        info!(origin = ?origin, "Request started");

        let response = next.run(req).await;

        let status = response.status();
        let code = status.as_u16();
        let latency_ms = start.elapsed().as_millis() as u64;
        if status.is_server_error() {
            warn!(status = code, latency_ms, "Request completed with server error");
        } else if status.is_client_error() {
            warn!(status = code, latency_ms, "Request completed with client error");
        } else {
            info!(status = code, latency_ms, "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}
