//! Shelf and box lookup port.

use async_trait::async_trait;

use super::CollaboratorError;
use crate::domain::{DocBox, Shelf};

/// Read access to the shelf/box organisation.
///
/// Mutations go through the CLI via the admin service; this port is
/// read-only.
#[async_trait]
pub trait ShelfCatalogPort: Send + Sync {
    async fn list_shelves(&self) -> Result<Vec<Shelf>, CollaboratorError>;

    async fn get_shelf(&self, name: &str) -> Result<Shelf, CollaboratorError>;

    /// All boxes, or only those on `shelf` when given.
    async fn list_boxes(&self, shelf: Option<&str>) -> Result<Vec<DocBox>, CollaboratorError>;

    async fn get_box(&self, name: &str) -> Result<DocBox, CollaboratorError>;
}
