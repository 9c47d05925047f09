//! Client and smoke scenarios against an in-process server

use todo_client::smoke::{self, Scenario};
use todo_client::{ClientConfig, ClientError, HttpClient, Priority, TodoCreate, TodoQuery};
use todo_server::{Config, Database, Environment, ServerState, build_app};

/// Serve a fresh in-memory app on an ephemeral port
async fn spawn_server(config: Config) -> HttpClient {
    let db = Database::in_memory().await.unwrap();
    let app = build_app(ServerState::new(config, db));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ClientConfig::new(format!("http://{addr}"))
        .with_timeout(10)
        .build_http_client()
        .unwrap()
}

async fn client() -> HttpClient {
    spawn_server(Config::for_tests()).await
}

#[tokio::test]
async fn test_health() {
    let client = client().await;
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert!(health.is_database_connected());
}

#[tokio::test]
async fn test_crud_through_client() {
    let client = client().await;

    let todo = client
        .create_todo(&TodoCreate::new("Call the plumber").with_priority("high"))
        .await
        .unwrap();
    assert_eq!(todo.priority, Priority::High);

    let fetched = client.get_todo(&todo.id).await.unwrap();
    assert_eq!(fetched, todo);

    let changed = client.set_priority(&todo.id, "low").await.unwrap();
    assert_eq!(changed.priority, Priority::Low);

    let query = TodoQuery {
        priority: Some("low".to_string()),
        sort: None,
    };
    assert_eq!(client.list_todos(&query).await.unwrap().len(), 1);

    let deleted = client.delete_todo(&todo.id).await.unwrap();
    assert_eq!(deleted.id, todo.id);
    assert!(client.get_todo(&todo.id).await.unwrap_err().is_not_found());
    assert_eq!(client.stats().await.unwrap().total, 0);
    assert!(client.overdue().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_errors_are_decoded() {
    let client = client().await;
    let err = client
        .create_todo(&TodoCreate::new("x").with_priority("urgent"))
        .await
        .unwrap_err();
    match err {
        ClientError::Validation { errors, .. } => {
            assert!(errors.iter().any(|e| e.contains("priority")));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_origin_is_forbidden() {
    let mut config = Config::for_tests();
    config.environment = Environment::Production;
    let client = spawn_server(config).await;

    let base = client.base_url().to_string();
    let client = ClientConfig::new(base)
        .with_origin("https://evil.example.com")
        .build_http_client()
        .unwrap();
    let err = client.stats().await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)), "got {err:?}");
}

#[tokio::test]
async fn test_every_scenario_passes() {
    for scenario in Scenario::ALL {
        let client = client().await;
        let report = scenario.run(&client).await;
        assert!(report.is_success(), "{report}");
        assert!(client.list_todos(&TodoQuery::default()).await.unwrap().is_empty(), "{} left todos behind", scenario.name());
    }
}

#[tokio::test]
async fn test_run_all_on_one_server() {
    let client = client().await;
    let reports = smoke::run_all(&client, &Scenario::ALL).await;
    assert_eq!(reports.len(), 4);
    for report in &reports {
        assert!(report.is_success(), "{report}");
    }
}
