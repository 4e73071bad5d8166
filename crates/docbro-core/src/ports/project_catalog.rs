//! Project catalog port.

use async_trait::async_trait;

use super::CollaboratorError;
use crate::domain::{ProjectInfo, ProjectQuery};

/// Lists the documentation projects the server can expose.
#[async_trait]
pub trait ProjectCatalogPort: Send + Sync {
    async fn list_projects(
        &self,
        query: &ProjectQuery,
    ) -> Result<Vec<ProjectInfo>, CollaboratorError>;

    /// Look up a project by name. Returns [`CollaboratorError::NotFound`]
    /// when it does not exist.
    async fn get_project(&self, name: &str) -> Result<ProjectInfo, CollaboratorError>;
}
