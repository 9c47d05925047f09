//! Database Module
//!
//! Owns the SurrealDB session. The `any` engine picks the backend from the
//! connection string, so tests run against `mem://` and deployments against
//! a remote server with the same code.

pub mod connection;
pub mod models;
pub mod repository;

pub use connection::{ConnectTarget, ConnectionString, Credentials};

use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use thiserror::Error;

use crate::core::config::ConfigError;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: surrealdb::Error,
    },

    #[error("authentication failed: {0}")]
    SignIn(#[source] surrealdb::Error),

    #[error("failed to select namespace '{namespace}' / database '{database}': {source}")]
    Select {
        namespace: String,
        database: String,
        #[source]
        source: surrealdb::Error,
    },
}

/// Where the session points, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Redacted connection string
    pub target: String,
    pub namespace: String,
    pub database: String,
}

/// Cloneable database session handle
#[derive(Debug, Clone)]
pub struct Database {
    db: Surreal<Any>,
    info: ConnectionInfo,
}

impl Database {
    /// Open a session: connect, sign in when credentials are present,
    /// then select namespace and database
    pub async fn connect(conn: &ConnectionString) -> Result<Self, DbError> {
        let target = conn.target()?;

        let db = any::connect(target.endpoint.as_str())
            .await
            .map_err(|source| DbError::Connect {
                endpoint: target.endpoint.clone(),
                source,
            })?;

        if let Some(credentials) = &target.credentials {
            db.signin(Root {
                username: &credentials.username,
                password: &credentials.password,
            })
            .await
            .map_err(DbError::SignIn)?;
        }

        db.use_ns(target.namespace.as_str())
            .use_db(target.database.as_str())
            .await
            .map_err(|source| DbError::Select {
                namespace: target.namespace.clone(),
                database: target.database.clone(),
                source,
            })?;

        let info = ConnectionInfo {
            target: conn.redacted(),
            namespace: target.namespace,
            database: target.database,
        };
        tracing::info!(
            conn = %info.target,
            namespace = %info.namespace,
            database = %info.database,
            "Database connection established"
        );

        Ok(Self { db, info })
    }

    /// Fresh in-memory database
    pub async fn in_memory() -> Result<Self, DbError> {
        Self::connect(&ConnectionString::parse("mem://")?).await
    }

    pub fn client(&self) -> &Surreal<Any> {
        &self.db
    }

    pub fn info(&self) -> &ConnectionInfo {
        &self.info
    }

    /// Whether the backend answers a health check
    pub async fn is_connected(&self) -> bool {
        self.db.health().await.is_ok()
    }

    /// End the session
    ///
    /// The engine closes the connection once the last handle is dropped.
    pub async fn close(self) {
        if let Err(e) = self.db.invalidate().await {
            tracing::debug!("Session invalidate failed: {e}");
        }
        tracing::info!(conn = %self.info.target, "Database connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_connects() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.is_connected().await);
        assert_eq!(db.info().namespace, "todo");
        assert_eq!(db.info().target, "mem://");
        db.close().await;
    }
}
