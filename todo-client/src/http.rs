//! HTTP client for the Todo API

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use shared::models::PriorityChange;

use crate::{
    ApiResponse, ClientConfig, ClientError, ClientResult, Todo, TodoCreate, TodoQuery, TodoStats,
    TodoUpdate,
};

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// `connected` or `disconnected`
    pub database: String,
}

impl HealthStatus {
    pub fn is_database_connected(&self) -> bool {
        self.database == "connected"
    }
}

/// HTTP client for making requests to the Todo server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    origin: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            origin: config.origin.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let request = self.client.request(method, url);
        match &self.origin {
            Some(origin) => request.header(reqwest::header::ORIGIN, origin),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::handle_response(response).await
    }

    /// Make a request with a JSON body
    pub async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(method, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return Err(ClientError::from_response(status, &text));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(Into::into)
    }

    fn data<T>(response: ApiResponse<T>, what: &str) -> ClientResult<T> {
        response
            .data
            .ok_or_else(|| ClientError::InvalidResponse(format!("Missing {what} data")))
    }

    // ========== Health ==========

    /// GET /health
    pub async fn health(&self) -> ClientResult<HealthStatus> {
        self.get("/health").await
    }

    // ========== Todo API ==========

    /// GET /api/todos with optional priority filter and sort
    pub async fn list_todos(&self, query: &TodoQuery) -> ClientResult<Vec<Todo>> {
        let response = self
            .request(Method::GET, "/api/todos")
            .query(query)
            .send()
            .await?;
        let body: ApiResponse<Vec<Todo>> = Self::handle_response(response).await?;
        Self::data(body, "todo list")
    }

    pub async fn get_todo(&self, id: &str) -> ClientResult<Todo> {
        let body = self.get(&format!("/api/todos/{id}")).await?;
        Self::data(body, "todo")
    }

    pub async fn create_todo(&self, todo: &TodoCreate) -> ClientResult<Todo> {
        let body = self.send_json(Method::POST, "/api/todos", todo).await?;
        Self::data(body, "todo")
    }

    pub async fn update_todo(&self, id: &str, update: &TodoUpdate) -> ClientResult<Todo> {
        let body = self
            .send_json(Method::PUT, &format!("/api/todos/{id}"), update)
            .await?;
        Self::data(body, "todo")
    }

    /// DELETE /api/todos/:id, returns the deleted todo
    pub async fn delete_todo(&self, id: &str) -> ClientResult<Todo> {
        let body = self.delete(&format!("/api/todos/{id}")).await?;
        Self::data(body, "todo")
    }

    /// PATCH /api/todos/:id/priority
    pub async fn set_priority(&self, id: &str, priority: &str) -> ClientResult<Todo> {
        let change = PriorityChange {
            priority: priority.to_string(),
        };
        let body = self
            .send_json(Method::PATCH, &format!("/api/todos/{id}/priority"), &change)
            .await?;
        Self::data(body, "todo")
    }

    pub async fn stats(&self) -> ClientResult<TodoStats> {
        let body = self.get("/api/todos/stats").await?;
        Self::data(body, "stats")
    }

    pub async fn overdue(&self) -> ClientResult<Vec<Todo>> {
        let body = self.get("/api/todos/overdue").await?;
        Self::data(body, "overdue")
    }
}
