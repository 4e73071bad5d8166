//! Core services with no transport or process knowledge.

mod file_access;

pub use file_access::{DEFAULT_MAX_CONTENT_BYTES, FileAccessController};
