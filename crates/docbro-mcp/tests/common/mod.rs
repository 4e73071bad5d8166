//! Collaborator doubles shared by the docbro-mcp integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use docbro_core::{
    BoxType, CollaboratorError, Collaborators, DocBox, ExecutorSettings, FileAccessController,
    ProjectCatalogPort, ProjectInfo, ProjectQuery, ProjectType, SearchHit, SearchPort,
    SearchRequest, Shelf, ShelfCatalogPort,
};
use docbro_mcp::{AdminService, ReadOnlyService};
use docbro_runtime::{CliClient, CliProjectCatalog, CliSearch, CliShelfCatalog, CommandExecutor};
use mockall::mock;
use tempfile::TempDir;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

mock! {
    pub Projects {}

    #[async_trait]
    impl ProjectCatalogPort for Projects {
        async fn list_projects(
            &self,
            query: &ProjectQuery,
        ) -> Result<Vec<ProjectInfo>, CollaboratorError>;
        async fn get_project(&self, name: &str) -> Result<ProjectInfo, CollaboratorError>;
    }
}

mock! {
    pub Search {}

    #[async_trait]
    impl SearchPort for Search {
        async fn search(
            &self,
            request: &SearchRequest,
        ) -> Result<Vec<SearchHit>, CollaboratorError>;
    }
}

/// In-memory shelf catalog. `unavailable` makes every call fail.
#[derive(Default)]
pub struct FakeShelves {
    pub shelves: Vec<Shelf>,
    pub boxes: Vec<DocBox>,
    pub unavailable: bool,
}

impl FakeShelves {
    fn check(&self) -> Result<(), CollaboratorError> {
        if self.unavailable {
            Err(CollaboratorError::Unavailable("shelf store offline".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ShelfCatalogPort for FakeShelves {
    async fn list_shelves(&self) -> Result<Vec<Shelf>, CollaboratorError> {
        self.check()?;
        Ok(self.shelves.clone())
    }

    async fn get_shelf(&self, name: &str) -> Result<Shelf, CollaboratorError> {
        self.check()?;
        self.shelves
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("shelf '{name}'")))
    }

    async fn list_boxes(&self, shelf: Option<&str>) -> Result<Vec<DocBox>, CollaboratorError> {
        self.check()?;
        Ok(self
            .boxes
            .iter()
            .filter(|b| shelf.is_none_or(|s| b.shelves.iter().any(|x| x == s)))
            .cloned()
            .collect())
    }

    async fn get_box(&self, name: &str) -> Result<DocBox, CollaboratorError> {
        self.check()?;
        self.boxes
            .iter()
            .find(|b| b.name == name)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("box '{name}'")))
    }
}

pub fn project(name: &str, project_type: ProjectType, root: &Path) -> ProjectInfo {
    ProjectInfo {
        name: name.to_string(),
        project_type,
        status: "active".to_string(),
        source_url: Some(format!("https://docs.example.com/{name}")),
        root_path: root.to_path_buf(),
        description: None,
        updated_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).single(),
    }
}

pub fn sample_shelves() -> FakeShelves {
    FakeShelves {
        shelves: vec![
            Shelf {
                name: "rust".into(),
                description: Some("Rust ecosystem".into()),
                is_current: true,
                box_names: vec!["tokio".into(), "serde".into()],
            },
            Shelf {
                name: "python".into(),
                description: None,
                is_current: false,
                box_names: vec![],
            },
        ],
        boxes: vec![
            DocBox {
                name: "tokio".into(),
                box_type: BoxType::Drag,
                description: Some("Tokio docs".into()),
                shelves: vec!["rust".into()],
                url: Some("https://docs.rs/tokio".into()),
            },
            DocBox {
                name: "serde".into(),
                box_type: BoxType::Rag,
                description: None,
                shelves: vec!["rust".into()],
                url: None,
            },
        ],
        unavailable: false,
    }
}

pub fn collaborators(
    projects: MockProjects,
    search: MockSearch,
    shelves: FakeShelves,
) -> Collaborators {
    Collaborators::new(Arc::new(projects), Arc::new(search), Arc::new(shelves))
}

/// Write an executable `/bin/sh` script named `docbro` into `dir`.
#[cfg(unix)]
pub fn fake_cli(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("docbro");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Admin service whose CLI is a fake script built from `body`.
#[cfg(unix)]
pub fn admin_with(body: &str) -> (TempDir, AdminService) {
    let dir = tempfile::tempdir().unwrap();
    let cli = fake_cli(dir.path(), body);
    let executor = CommandExecutor::new(ExecutorSettings::with_defaults().with_cli_path(cli));
    let read_only = ReadOnlyService::new(
        collaborators(MockProjects::new(), MockSearch::new(), sample_shelves()),
        FileAccessController::new(),
    );
    (dir, AdminService::new(Arc::new(read_only), Arc::new(executor)))
}

/// Read-only service whose collaborators shell out to a fake CLI built
/// from `body`.
#[cfg(unix)]
pub fn read_only_over_cli(body: &str) -> (TempDir, ReadOnlyService) {
    let dir = tempfile::tempdir().unwrap();
    let cli = fake_cli(dir.path(), body);
    let executor = Arc::new(CommandExecutor::new(
        ExecutorSettings::with_defaults().with_cli_path(cli),
    ));
    let client = CliClient::new(executor);
    let collaborators = Collaborators::new(
        Arc::new(CliProjectCatalog::new(client.clone())),
        Arc::new(CliSearch::new(client.clone())),
        Arc::new(CliShelfCatalog::new(client)),
    );
    (
        dir,
        ReadOnlyService::new(collaborators, FileAccessController::new()),
    )
}
