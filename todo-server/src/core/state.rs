use std::sync::Arc;

use crate::core::{Config, Result};
use crate::db::Database;
use crate::db::repository::TodoRepository;

/// Server state, shared by every handler
///
/// Cloning is cheap: the config sits behind an `Arc` and the database
/// handle is itself a shared session.
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Arc<Config> | configuration (immutable) |
/// | db | Database | SurrealDB session |
/// | todos | TodoRepository | todo persistence |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: Database,
    pub todos: TodoRepository,
}

impl ServerState {
    pub fn new(config: Config, db: Database) -> Self {
        let todos = TodoRepository::new(db.client().clone());
        Self {
            config: Arc::new(config),
            db,
            todos,
        }
    }

    /// Resolve the connection string and open the database
    ///
    /// Fails on a missing or invalid connection string and on the first
    /// connection attempt; there is no retry.
    pub async fn initialize(config: &Config) -> Result<Self> {
        let conn = config.database.connection_string()?;
        tracing::info!(database = %conn.redacted(), "Connecting to database...");
        let db = Database::connect(&conn).await?;
        Ok(Self::new(config.clone(), db))
    }
}
