//! Collaborator ports backed by the DocBro CLI.
//!
//! Each adapter issues `docbro <verb> ... --format json` through the
//! shared [`crate::CommandExecutor`] and maps the JSON output onto domain types.

mod client;
pub mod project_catalog;
pub mod search;
pub mod shelf_catalog;

pub use client::CliClient;
use client::value_arg;
pub use project_catalog::CliProjectCatalog;
pub use search::CliSearch;
pub use shelf_catalog::CliShelfCatalog;
