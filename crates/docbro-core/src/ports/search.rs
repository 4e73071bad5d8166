//! Search port over the RAG pipeline.

use async_trait::async_trait;

use super::CollaboratorError;
use crate::domain::{SearchHit, SearchRequest};

#[async_trait]
pub trait SearchPort: Send + Sync {
    /// Ranked hits, best first. Ranking is entirely the collaborator's
    /// business.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, CollaboratorError>;
}
