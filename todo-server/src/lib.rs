//! Todo Server - REST API for todos backed by SurrealDB
//!
//! # Modules
//!
//! ```text
//! todo-server/src/
//! ├── core/          # config, state, errors, server
//! ├── db/            # connection, models, repository
//! ├── api/           # HTTP routes and handlers
//! ├── middleware/    # CORS, request log, error detail
//! └── utils/         # logging, validation helpers
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod middleware;
pub mod utils;

// Re-export public types
pub use api::{build_app, build_router};
pub use core::{Config, Environment, Server, ServerError, ServerState};
pub use db::Database;
pub use db::repository::TodoRepository;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and install the logger
pub fn setup_environment() -> Result<(), ServerError> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(ServerError::Internal(anyhow::anyhow!("failed to load .env: {e}")));
    }

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  _____           _
 |_   _|__   __| | ___
   | |/ _ \ / _` |/ _ \
   | | (_) | (_| | (_) |
   |_|\___/ \__,_|\___/   v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
