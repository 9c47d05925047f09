//! HTTP middleware

pub mod cors;
pub mod error_detail;
pub mod logging;

pub use cors::{CorsDecision, CorsPolicy, cors_gate};
pub use error_detail::{expose_error_detail, panic_response};
pub use logging::logging_middleware;
