//! Port definitions for the external collaborators the MCP server consumes.
//!
//! The crawler, search pipeline and shelf/box persistence live outside this
//! server. Services talk to them only through these traits, which use
//! domain types and [`CollaboratorError`].

pub mod project_catalog;
pub mod search;
pub mod shelf_catalog;

use std::sync::Arc;
use thiserror::Error;

pub use project_catalog::ProjectCatalogPort;
pub use search::SearchPort;
pub use shelf_catalog::ShelfCatalogPort;

/// Container for the collaborator trait objects.
///
/// Built once at startup and handed to both services, so tests can swap in
/// substitutes without touching the services themselves.
#[derive(Clone)]
pub struct Collaborators {
    pub projects: Arc<dyn ProjectCatalogPort>,
    pub search: Arc<dyn SearchPort>,
    pub shelves: Arc<dyn ShelfCatalogPort>,
}

impl Collaborators {
    pub fn new(
        projects: Arc<dyn ProjectCatalogPort>,
        search: Arc<dyn SearchPort>,
        shelves: Arc<dyn ShelfCatalogPort>,
    ) -> Self {
        Self {
            projects,
            search,
            shelves,
        }
    }
}

/// Errors reported by an external collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The named entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The collaborator could not be reached or did not start.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The collaborator answered with something we could not parse.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The collaborator ran but reported a failure.
    #[error("Operation failed: {0}")]
    Failed(String),

    /// A value would have been read by the CLI as an option.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own representation (HTTP status codes,
/// JSON-RPC error codes).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// Invalid input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Rejected by a security check before any side effect.
    #[error("Security violation: {0}")]
    Security(String),

    /// The operation is never permitted through this server.
    #[error("operation_prohibited")]
    Prohibited,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::domain::CommandRequestError> for CoreError {
    fn from(err: crate::domain::CommandRequestError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<crate::domain::FileAccessError> for CoreError {
    fn from(err: crate::domain::FileAccessError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<crate::security::NameError> for CoreError {
    fn from(err: crate::security::NameError) -> Self {
        Self::Validation(err.to_string())
    }
}
