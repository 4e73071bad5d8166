//! In-memory collaborators and request helpers for route tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use docbro_core::{
    BoxType, CollaboratorError, Collaborators, DocBox, ExecutorSettings, FileAccessController,
    ProjectCatalogPort, ProjectInfo, ProjectQuery, ProjectType, SearchHit, SearchPort,
    SearchRequest, Shelf, ShelfCatalogPort,
};
use docbro_mcp::ReadOnlyService;
use docbro_runtime::CommandExecutor;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Projects, shelves and boxes held in memory.
#[derive(Clone, Default)]
pub struct InMemoryDocbro {
    pub projects: Vec<ProjectInfo>,
    pub shelves: Vec<Shelf>,
    pub boxes: Vec<DocBox>,
}

impl InMemoryDocbro {
    /// One storage project rooted at `root`, one shelf, one box.
    pub fn sample(root: &Path) -> Self {
        Self {
            projects: vec![ProjectInfo {
                name: "notes".into(),
                project_type: ProjectType::Storage,
                status: "active".into(),
                source_url: None,
                root_path: root.to_path_buf(),
                description: Some("Team notes".into()),
                updated_at: None,
            }],
            shelves: vec![Shelf {
                name: "rust".into(),
                description: None,
                is_current: true,
                box_names: vec!["tokio".into()],
            }],
            boxes: vec![DocBox {
                name: "tokio".into(),
                box_type: BoxType::Drag,
                description: None,
                shelves: vec!["rust".into()],
                url: Some("https://docs.rs/tokio".into()),
            }],
        }
    }

    pub fn collaborators(self) -> Collaborators {
        let shared = Arc::new(self);
        Collaborators::new(shared.clone(), shared.clone(), shared)
    }
}

#[async_trait]
impl ProjectCatalogPort for InMemoryDocbro {
    async fn list_projects(
        &self,
        query: &ProjectQuery,
    ) -> Result<Vec<ProjectInfo>, CollaboratorError> {
        Ok(self
            .projects
            .iter()
            .filter(|p| query.status.as_ref().is_none_or(|s| &p.status == s))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn get_project(&self, name: &str) -> Result<ProjectInfo, CollaboratorError> {
        self.projects
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("project '{name}'")))
    }
}

#[async_trait]
impl SearchPort for InMemoryDocbro {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, CollaboratorError> {
        Ok(self
            .projects
            .iter()
            .filter(|p| p.name.contains(&request.query))
            .take(request.limit)
            .map(|p| SearchHit {
                project: p.name.clone(),
                title: p.name.clone(),
                url: p.source_url.clone().unwrap_or_default(),
                snippet: p.description.clone().unwrap_or_default(),
                score: 1.0,
            })
            .collect())
    }
}

#[async_trait]
impl ShelfCatalogPort for InMemoryDocbro {
    async fn list_shelves(&self) -> Result<Vec<Shelf>, CollaboratorError> {
        Ok(self.shelves.clone())
    }

    async fn get_shelf(&self, name: &str) -> Result<Shelf, CollaboratorError> {
        self.shelves
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("shelf '{name}'")))
    }

    async fn list_boxes(&self, shelf: Option<&str>) -> Result<Vec<DocBox>, CollaboratorError> {
        Ok(self
            .boxes
            .iter()
            .filter(|b| shelf.is_none_or(|s| b.shelves.iter().any(|x| x == s)))
            .cloned()
            .collect())
    }

    async fn get_box(&self, name: &str) -> Result<DocBox, CollaboratorError> {
        self.boxes
            .iter()
            .find(|b| b.name == name)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("box '{name}'")))
    }
}

/// Read-only service over the sample catalog. The project root holds
/// `README.md`.
pub fn sample_service() -> (TempDir, Arc<ReadOnlyService>) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("README.md"), "# notes").unwrap();
    let service = ReadOnlyService::new(
        InMemoryDocbro::sample(dir.path()).collaborators(),
        FileAccessController::new(),
    );
    (dir, Arc::new(service))
}

/// Write an executable `/bin/sh` script named `docbro` into `dir`.
#[cfg(unix)]
pub fn fake_cli(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("docbro");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
pub fn executor_with(dir: &Path, body: &str) -> Arc<CommandExecutor> {
    let cli = fake_cli(dir, body);
    Arc::new(CommandExecutor::new(
        ExecutorSettings::with_defaults().with_cli_path(cli),
    ))
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Send a request and decode the JSON body (`Null` when empty).
pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = send(app, request).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
