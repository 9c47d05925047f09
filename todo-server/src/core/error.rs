use std::net::SocketAddr;

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::db::DbError;

/// Errors that stop the server
///
/// Request-level failures are [`shared::AppError`]; this type only covers
/// startup and the serve loop.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database connection failed: {0}")]
    Database(#[from] DbError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServerError {
    /// Operator hint, if there is one
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            ServerError::Config(e) | ServerError::Database(DbError::Config(e)) => {
                Some(e.remediation())
            }
            ServerError::Database(_) => {
                Some("Check that the database is reachable and the credentials are correct")
            }
            ServerError::Bind { .. } => Some("Set PORT to a free port"),
            ServerError::Internal(_) => None,
        }
    }
}

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ServerError>;
