//! `ProjectCatalogPort` over `docbro project`.

use async_trait::async_trait;
use docbro_core::{CollaboratorError, ProjectCatalogPort, ProjectInfo, ProjectQuery};

use super::{CliClient, value_arg};

#[derive(Debug, Clone)]
pub struct CliProjectCatalog {
    client: CliClient,
}

impl CliProjectCatalog {
    pub const fn new(client: CliClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProjectCatalogPort for CliProjectCatalog {
    async fn list_projects(
        &self,
        query: &ProjectQuery,
    ) -> Result<Vec<ProjectInfo>, CollaboratorError> {
        let mut args = vec!["project".to_string(), "--list".to_string()];
        if let Some(status) = &query.status {
            args.push("--status".to_string());
            args.push(value_arg(status)?);
        }
        if let Some(limit) = query.limit {
            args.push("--limit".to_string());
            args.push(limit.to_string());
        }
        self.client.query(args, "projects").await
    }

    async fn get_project(&self, name: &str) -> Result<ProjectInfo, CollaboratorError> {
        let args = vec!["project".to_string(), "--show".to_string(), value_arg(name)?];
        self.client.query(args, "project").await
    }
}
