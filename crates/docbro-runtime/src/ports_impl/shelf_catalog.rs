//! `ShelfCatalogPort` over `docbro shelf` / `docbro box`.

use async_trait::async_trait;
use docbro_core::{CollaboratorError, DocBox, Shelf, ShelfCatalogPort};

use super::{CliClient, value_arg};

#[derive(Debug, Clone)]
pub struct CliShelfCatalog {
    client: CliClient,
}

impl CliShelfCatalog {
    pub const fn new(client: CliClient) -> Self {
        Self { client }
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

#[async_trait]
impl ShelfCatalogPort for CliShelfCatalog {
    async fn list_shelves(&self) -> Result<Vec<Shelf>, CollaboratorError> {
        self.client.query(args(&["shelf", "list"]), "shelves").await
    }

    async fn get_shelf(&self, name: &str) -> Result<Shelf, CollaboratorError> {
        let name = value_arg(name)?;
        self.client.query(args(&["shelf", "inspect", &name]), "shelf").await
    }

    async fn list_boxes(&self, shelf: Option<&str>) -> Result<Vec<DocBox>, CollaboratorError> {
        let argv = match shelf {
            Some(shelf) => args(&["box", "list", "--shelf", &value_arg(shelf)?]),
            None => args(&["box", "list"]),
        };
        self.client.query(argv, "boxes").await
    }

    async fn get_box(&self, name: &str) -> Result<DocBox, CollaboratorError> {
        let name = value_arg(name)?;
        self.client.query(args(&["box", "inspect", &name]), "box").await
    }
}
