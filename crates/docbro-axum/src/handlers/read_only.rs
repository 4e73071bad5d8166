//! Read-only REST endpoints. Mounted on both servers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use docbro_core::{ProjectQuery, SearchRequest};
use docbro_mcp::ReadOnlyService;
use docbro_mcp::services::args::ProjectFilesArgs;

use super::{envelope, parse_body};
use crate::error::HttpError;

pub async fn list_projects(
    State(service): State<Arc<ReadOnlyService>>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let query: ProjectQuery = parse_body(&body)?;
    Ok(envelope(service.list_projects(&query).await?))
}

pub async fn search_projects(
    State(service): State<Arc<ReadOnlyService>>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let request: SearchRequest = parse_body(&body)?;
    Ok(envelope(service.search_projects(&request).await?))
}

pub async fn get_project_files(
    State(service): State<Arc<ReadOnlyService>>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let args: ProjectFilesArgs = parse_body(&body)?;
    Ok(envelope(service.get_project_files(&args).await?))
}

/// Always 200; degraded collaborators are reported in the body.
pub async fn health(State(service): State<Arc<ReadOnlyService>>) -> Response {
    envelope(service.health().await)
}
