//! Database Models

pub mod todo;

pub use todo::{TodoDraft, TodoRecord, record_key};
