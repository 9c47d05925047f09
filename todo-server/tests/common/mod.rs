//! Shared helpers for the HTTP tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use todo_server::{Config, Database, Environment, ServerState, build_app};
use tower::ServiceExt;

/// App on a fresh in-memory database
pub async fn app_with(config: Config) -> Router {
    app_and_db(config).await.0
}

/// App plus a handle on its database, for seeding rows directly
pub async fn app_and_db(config: Config) -> (Router, Database) {
    let db = Database::in_memory().await.unwrap();
    let app = build_app(ServerState::new(config, db.clone()));
    (app, db)
}

pub async fn app() -> Router {
    app_with(Config::for_tests()).await
}

pub async fn production_app() -> Router {
    let mut config = Config::for_tests();
    config.environment = Environment::Production;
    app_with(config).await
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    origin: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    into_test_response(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn send_raw(app: &Router, request: Request<Body>) -> TestResponse {
    into_test_response(app.clone().oneshot(request).await.unwrap()).await
}

async fn into_test_response(response: http::Response<Body>) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, Method::PUT, uri, Some(body), None).await
}

pub async fn delete(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::DELETE, uri, None, None).await
}

/// Create a todo and return its JSON
pub async fn create_todo(app: &Router, body: Value) -> Value {
    let response = post(app, "/api/todos", body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"].clone()
}

pub async fn todo_count(app: &Router) -> u64 {
    get(app, "/api/todos/stats").await.body["data"]["total"]
        .as_u64()
        .unwrap()
}
