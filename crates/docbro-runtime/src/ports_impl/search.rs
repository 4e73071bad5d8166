//! `SearchPort` over `docbro search`.

use async_trait::async_trait;
use docbro_core::{CollaboratorError, SearchHit, SearchPort, SearchRequest};

use super::{CliClient, value_arg};

#[derive(Debug, Clone)]
pub struct CliSearch {
    client: CliClient,
}

impl CliSearch {
    pub const fn new(client: CliClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchPort for CliSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, CollaboratorError> {
        let mut args = vec!["search".to_string(), value_arg(&request.query)?];
        for project in &request.project_names {
            args.push("--project".to_string());
            args.push(value_arg(project)?);
        }
        args.push("--limit".to_string());
        args.push(request.limit.to_string());
        self.client.query(args, "results").await
    }
}
