//! Admin-only REST endpoints.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use docbro_core::CommandExecutionSpec;
use docbro_mcp::services::args::{
    BoxCreateArgs, BoxShelfArgs, CrawlArgs, FillArgs, ProjectCreateArgs, ProjectRemoveArgs,
    ShelfCreateArgs, ShelfNameArgs,
};

use super::{envelope, parse_body};
use crate::error::HttpError;
use crate::state::AdminState;

pub async fn execute_command(
    State(state): State<AdminState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let spec: CommandExecutionSpec = parse_body(&body)?;
    Ok(envelope(state.service.execute_command(spec).await?))
}

pub async fn project_create(
    State(state): State<AdminState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let args: ProjectCreateArgs = parse_body(&body)?;
    Ok(envelope(state.service.project_create(&args).await?))
}

pub async fn project_remove(
    State(state): State<AdminState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let args: ProjectRemoveArgs = parse_body(&body)?;
    Ok(envelope(state.service.project_remove(&args).await?))
}

pub async fn crawl_project(
    State(state): State<AdminState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let args: CrawlArgs = parse_body(&body)?;
    Ok(envelope(state.service.crawl_project(&args).await?))
}

pub async fn create_shelf(
    State(state): State<AdminState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let args: ShelfCreateArgs = parse_body(&body)?;
    Ok(envelope(state.service.create_shelf(&args).await?))
}

pub async fn set_current_shelf(
    State(state): State<AdminState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let args: ShelfNameArgs = parse_body(&body)?;
    Ok(envelope(state.service.set_current_shelf(&args).await?))
}

pub async fn create_box(
    State(state): State<AdminState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let args: BoxCreateArgs = parse_body(&body)?;
    Ok(envelope(state.service.create_box(&args).await?))
}

pub async fn add_basket(
    State(state): State<AdminState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let args: BoxShelfArgs = parse_body(&body)?;
    Ok(envelope(state.service.add_basket(&args).await?))
}

pub async fn remove_basket(
    State(state): State<AdminState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let args: BoxShelfArgs = parse_body(&body)?;
    Ok(envelope(state.service.remove_basket(&args).await?))
}

pub async fn fill_box(
    State(state): State<AdminState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let args: FillArgs = parse_body(&body)?;
    Ok(envelope(state.service.fill_box(&args).await?))
}

/// Refused regardless of the request body.
pub async fn delete_shelf(State(state): State<AdminState>) -> Result<Response, HttpError> {
    Ok(envelope(state.service.delete_shelf()?))
}

pub async fn health(State(state): State<AdminState>) -> Response {
    envelope(state.service.health())
}
