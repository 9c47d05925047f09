//! Internal error detail in development
//!
//! [`shared::AppError`] attaches its detail as a response extension. In
//! development the detail of a 5xx response is merged into the body as
//! `error`. Client errors and every production response keep the generic
//! body.

use std::any::Any;

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::AppError;
use shared::error::ErrorDetail;

use crate::core::Environment;

pub async fn expose_error_detail(
    State(environment): State<Environment>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    let Some(detail) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };
    if !environment.is_development() || !response.status().is_server_error() {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(http::header::CONTENT_LENGTH);
    let body = Json(detail.into_body()).into_response().into_body();
    Response::from_parts(parts, body)
}

/// 500 for a handler that panicked
///
/// The panic message travels as [`ErrorDetail`], so it reaches the body only
/// through [`expose_error_detail`] in development.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    AppError::internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, middleware::from_fn_with_state, routing::get};
    use http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(environment: Environment) -> Router {
        Router::new()
            .route("/db", get(|| async { AppError::database("socket closed") }))
            .route("/missing", get(|| async { AppError::todo_not_found("abc") }))
            .layer(from_fn_with_state(environment, expose_error_detail))
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = http::Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_server_error_detail_in_development() {
        let (status, body) = call(app(Environment::Development), "/db").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "socket closed");

        let (_, body) = call(app(Environment::Production), "/db").await;
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_client_error_detail_never_exposed() {
        let (status, body) = call(app(Environment::Development), "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.get("error").is_none());
    }

    #[test]
    fn test_panic_response() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<ErrorDetail>().unwrap();
        assert_eq!(detail.detail, "boom");
        assert_eq!(detail.body.message, "Internal server error");

        let response = panic_response(Box::new(String::from("index out of bounds")));
        let detail = response.extensions().get::<ErrorDetail>().unwrap();
        assert_eq!(detail.detail, "index out of bounds");
    }
}
