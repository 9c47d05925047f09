//! CORS policy
//!
//! Two layers cooperate:
//!
//! - [`cors_gate`] decides whether a cross-origin request may proceed at all
//!   and answers 403 when it may not
//! - [`CorsPolicy::layer`] adds the CORS response headers and answers
//!   preflight requests for origins that passed the gate
//!
//! Decision order: no `Origin` header, open mode, allow-list, then the
//! environment (development warns and allows, production rejects).

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{HeaderName, Method, header};
use shared::AppError;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::core::{Config, Environment};

/// Local development front-ends that are always allowed
pub const LOCAL_DEV_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:4200",
    "http://localhost:8080",
    "http://localhost:5173",
    "http://localhost:5174",
    "http://localhost:5500",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:5000",
    "http://127.0.0.1:5500",
    // Pages opened from the file system
    "null",
];

/// Preflight cache lifetime
pub const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Outcome of the origin check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorsDecision {
    Allow,
    /// Not on the list, let through in development only
    AllowWithWarning,
    Reject,
}

/// Pure origin decision
pub fn decide(
    origin: Option<&str>,
    open: bool,
    environment: Environment,
    allowed: &[String],
) -> CorsDecision {
    let Some(origin) = origin else {
        return CorsDecision::Allow;
    };
    if open || allowed.iter().any(|a| a == origin) {
        return CorsDecision::Allow;
    }
    match environment {
        Environment::Development => CorsDecision::AllowWithWarning,
        Environment::Production => CorsDecision::Reject,
    }
}

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed: Vec<String>,
    open: bool,
    environment: Environment,
}

impl CorsPolicy {
    pub fn new(allowed: Vec<String>, open: bool, environment: Environment) -> Self {
        Self {
            allowed,
            open,
            environment,
        }
    }

    /// Built-in list plus `FRONTEND_URL`
    pub fn from_config(config: &Config) -> Self {
        let mut allowed: Vec<String> = LOCAL_DEV_ORIGINS.iter().map(|o| o.to_string()).collect();
        if let Some(frontend) = &config.cors.frontend_url {
            let frontend = frontend.trim_end_matches('/').to_string();
            if !allowed.contains(&frontend) {
                allowed.push(frontend);
            }
        }
        Self::new(allowed, config.cors.open, config.environment)
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed
    }

    pub fn decide(&self, origin: Option<&str>) -> CorsDecision {
        decide(origin, self.open, self.environment, &self.allowed)
    }

    /// Header layer for requests that passed the gate
    ///
    /// The request origin is echoed back, which together with credentials
    /// is only safe because [`cors_gate`] runs first.
    pub fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::PATCH,
                Method::OPTIONS,
                Method::HEAD,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                HeaderName::from_static("x-requested-with"),
                HeaderName::from_static("x-http-method-override"),
                header::ACCEPT,
                header::ORIGIN,
            ])
            .expose_headers([
                header::CONTENT_LENGTH,
                header::CONTENT_RANGE,
                HeaderName::from_static("x-content-range"),
                HeaderName::from_static("x-total-count"),
            ])
            .max_age(PREFLIGHT_MAX_AGE)
    }
}

/// Origin gate, applied outermost
pub async fn cors_gate(
    State(policy): State<Arc<CorsPolicy>>,
    req: Request,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    match policy.decide(origin.as_deref()) {
        CorsDecision::Allow => next.run(req).await,
        CorsDecision::AllowWithWarning => {
            tracing::warn!(
                origin = origin.as_deref().unwrap_or_default(),
                "Origin not in CORS allow-list, allowed in development"
            );
            next.run(req).await
        }
        CorsDecision::Reject => {
            let origin = origin.unwrap_or_default();
            tracing::warn!(origin = %origin, "CORS request rejected");
            AppError::origin_not_allowed(&origin).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> Vec<String> {
        LOCAL_DEV_ORIGINS.iter().map(|o| o.to_string()).collect()
    }

    #[test]
    fn test_no_origin_always_allowed() {
        assert_eq!(
            decide(None, false, Environment::Production, &list()),
            CorsDecision::Allow
        );
    }

    #[test]
    fn test_listed_origin_allowed() {
        assert_eq!(
            decide(
                Some("http://localhost:5173"),
                false,
                Environment::Production,
                &list()
            ),
            CorsDecision::Allow
        );
        assert_eq!(
            decide(Some("null"), false, Environment::Production, &list()),
            CorsDecision::Allow
        );
    }

    #[test]
    fn test_unlisted_origin_by_environment() {
        let origin = Some("https://evil.example");
        assert_eq!(
            decide(origin, false, Environment::Production, &list()),
            CorsDecision::Reject
        );
        assert_eq!(
            decide(origin, false, Environment::Development, &list()),
            CorsDecision::AllowWithWarning
        );
    }

    #[test]
    fn test_open_mode_allows_everything() {
        assert_eq!(
            decide(Some("https://evil.example"), true, Environment::Production, &[]),
            CorsDecision::Allow
        );
    }

    #[test]
    fn test_frontend_url_appended() {
        let mut config = Config::from_lookup(|_| None);
        config.cors.frontend_url = Some("https://todo.example.com/".into());
        let policy = CorsPolicy::from_config(&config);
        assert_eq!(
            policy.decide(Some("https://todo.example.com")),
            CorsDecision::Allow
        );
        assert_eq!(policy.allowed_origins().len(), LOCAL_DEV_ORIGINS.len() + 1);
    }
}
