//! 5xx responses and the development-only error detail

mod common;

use common::*;
use http::StatusCode;
use todo_server::{Config, Database, Environment};

/// A row whose priority and timestamps cannot be decoded
async fn seed_corrupt_row(db: &Database) {
    db.client()
        .query("CREATE todo:abc SET title = 'x', priority = 'urgent', created_at = 'nope', updated_at = 'nope'")
        .await
        .unwrap()
        .check()
        .unwrap();
}

fn production() -> Config {
    let mut config = Config::for_tests();
    config.environment = Environment::Production;
    config
}

#[tokio::test]
async fn undecodable_rows_are_server_errors_with_detail_in_development() {
    let (app, db) = app_and_db(Config::for_tests()).await;
    seed_corrupt_row(&db).await;

    for uri in ["/api/todos", "/api/todos/stats"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(response.body["success"], false);
        assert_eq!(response.body["code"], 9002);
        assert_eq!(response.body["message"], "Database operation failed");
        assert!(response.body["error"].is_string(), "{uri}: {}", response.body);
    }
}

#[tokio::test]
async fn production_server_errors_stay_generic() {
    let (app, db) = app_and_db(production()).await;
    seed_corrupt_row(&db).await;

    for uri in ["/api/todos", "/api/todos/stats"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(response.body["message"], "Database operation failed");
        assert!(response.body.get("error").is_none(), "{uri}: {}", response.body);
    }
}
