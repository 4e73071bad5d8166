//! Query-only capabilities. Nothing here mutates state.

use async_trait::async_trait;
use docbro_core::{
    CollaboratorError, Collaborators, CoreError, FileAccessController, FileAccessRequest,
    FileAccessType, McpResponse, McpTool, ProjectQuery, SearchRequest,
};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::args::{
    BoxListArgs, ProjectFilesArgs, check_name, check_optional_name, check_text, parse_args,
};
use crate::registry::{self, JSON_MIME, ResourceUri, tool_names as t};
use crate::service::{
    CapabilityService, ResourceContents, ResourceListing, ServerRole, ToolCallError,
    into_tool_result,
};

/// Upper bound on search results per request.
pub const MAX_SEARCH_LIMIT: usize = 100;

pub struct ReadOnlyService {
    collaborators: Collaborators,
    files: FileAccessController,
    tools: Vec<McpTool>,
}

impl ReadOnlyService {
    pub fn new(collaborators: Collaborators, files: FileAccessController) -> Self {
        Self {
            collaborators,
            files,
            tools: registry::read_only_tools(),
        }
    }

    pub async fn list_projects(&self, query: &ProjectQuery) -> Result<McpResponse, CoreError> {
        if query.limit == Some(0) {
            return Err(CoreError::Validation("limit must be at least 1".into()));
        }
        if let Some(status) = &query.status {
            check_text("status", status)?;
        }
        let projects = self.collaborators.projects.list_projects(query).await?;
        let count = projects.len();
        Ok(McpResponse::success(to_json(&projects)?).with_metadata(json!({ "count": count })))
    }

    pub async fn search_projects(&self, request: &SearchRequest) -> Result<McpResponse, CoreError> {
        check_text("query", &request.query)?;
        for project in &request.project_names {
            check_name("project", project)?;
        }
        if !(1..=MAX_SEARCH_LIMIT).contains(&request.limit) {
            return Err(CoreError::Validation(format!(
                "limit must be between 1 and {MAX_SEARCH_LIMIT}"
            )));
        }
        let hits = self.collaborators.search.search(request).await?;
        let count = hits.len();
        Ok(McpResponse::success(to_json(&hits)?)
            .with_metadata(json!({ "count": count, "query": request.query })))
    }

    /// File listing for a project. Content is attached only when asked for
    /// and the project type permits it.
    pub async fn get_project_files(
        &self,
        args: &ProjectFilesArgs,
    ) -> Result<McpResponse, CoreError> {
        let access = if args.include_content {
            FileAccessType::Content
        } else {
            FileAccessType::Metadata
        };
        check_name("project", &args.project_name)?;
        let request = FileAccessRequest::new(&args.project_name, args.file_path.clone(), access)?;
        let project = self
            .collaborators
            .projects
            .get_project(request.project_name())
            .await?;

        let include_content =
            args.include_content && self.files.validate_access(&request, project.project_type);
        if args.include_content && !include_content {
            debug!(
                project = %project.name,
                project_type = %project.project_type,
                "Content requested for a project that only allows metadata"
            );
        }

        let files = self
            .files
            .get_file_metadata(&project.root_path, request.file_path())
            .await;

        let mut entries = Vec::with_capacity(files.len());
        for file in &files {
            let mut entry = to_json(file)?;
            if include_content {
                if let Some(text) = self
                    .files
                    .get_file_content(&project.root_path, &file.path, project.project_type)
                    .await
                {
                    entry["content"] = Value::String(text);
                }
            }
            entries.push(entry);
        }

        Ok(McpResponse::success(json!({
            "project": project.name,
            "project_type": project.project_type,
            "files": entries,
        }))
        .with_metadata(json!({
            "file_count": files.len(),
            "content_included": include_content,
            "max_access": project.project_type.max_access(),
        })))
    }

    pub async fn list_shelves(&self) -> Result<McpResponse, CoreError> {
        let shelves = self.collaborators.shelves.list_shelves().await?;
        let current = shelves.iter().find(|s| s.is_current).map(|s| s.name.clone());
        let data: Vec<Value> = shelves
            .iter()
            .map(|s| {
                json!({
                    "name": s.name,
                    "description": s.description,
                    "is_current": s.is_current,
                    "box_count": s.box_count(),
                    "boxes": s.box_names,
                })
            })
            .collect();
        Ok(McpResponse::success(Value::Array(data))
            .with_metadata(json!({ "count": shelves.len(), "current_shelf": current })))
    }

    pub async fn list_boxes(&self, shelf: Option<&str>) -> Result<McpResponse, CoreError> {
        check_optional_name("shelf", shelf)?;
        let boxes = self.collaborators.shelves.list_boxes(shelf).await?;
        let count = boxes.len();
        Ok(McpResponse::success(to_json(&boxes)?)
            .with_metadata(json!({ "count": count, "shelf": shelf })))
    }

    /// Per-collaborator availability. A failing collaborator is reported
    /// as unavailable; the check itself never fails.
    pub async fn health(&self) -> McpResponse {
        let probe = ProjectQuery {
            status: None,
            limit: Some(1),
        };
        let (projects, shelves) = tokio::join!(
            self.collaborators.projects.list_projects(&probe),
            self.collaborators.shelves.list_shelves(),
        );

        let projects = probe_status("projects", projects.map(|_| ()));
        let shelves = probe_status("shelves", shelves.map(|_| ()));
        let healthy = projects["status"] == "available" && shelves["status"] == "available";

        McpResponse::success(json!({
            "server_type": ServerRole::ReadOnly.as_str(),
            "status": if healthy { "healthy" } else { "degraded" },
            "services": {
                "projects": projects,
                "shelves": shelves,
            },
        }))
    }

    /// Dispatch a read-only tool. `None` when `name` is not one.
    pub(crate) async fn call_read_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Option<Result<McpResponse, CoreError>> {
        let result = match name {
            t::PROJECT_LIST => match parse_args::<ProjectQuery>(arguments) {
                Ok(query) => self.list_projects(&query).await,
                Err(e) => Err(e),
            },
            t::PROJECT_FILES => match parse_args::<ProjectFilesArgs>(arguments) {
                Ok(args) => self.get_project_files(&args).await,
                Err(e) => Err(e),
            },
            t::SEARCH => match parse_args::<SearchRequest>(arguments) {
                Ok(request) => self.search_projects(&request).await,
                Err(e) => Err(e),
            },
            t::SHELF_LIST => self.list_shelves().await,
            t::BOX_LIST => match parse_args::<BoxListArgs>(arguments) {
                Ok(args) => self.list_boxes(args.shelf.as_deref()).await,
                Err(e) => Err(e),
            },
            _ => return None,
        };
        Some(result)
    }

    pub(crate) async fn resource_listing(&self) -> ResourceListing {
        let (shelves, boxes) = tokio::join!(
            self.collaborators.shelves.list_shelves(),
            self.collaborators.shelves.list_boxes(None),
        );

        let mut listing = ResourceListing::default();
        match shelves {
            Ok(shelves) => {
                listing.shelf_count = shelves.len();
                listing
                    .resources
                    .extend(shelves.iter().map(registry::shelf_resource));
            }
            Err(e) => warn!(error = %e, "Shelf listing failed; omitting shelf resources"),
        }
        match boxes {
            Ok(boxes) => {
                listing.box_count = boxes.len();
                listing
                    .resources
                    .extend(boxes.iter().map(registry::box_resource));
            }
            Err(e) => warn!(error = %e, "Box listing failed; omitting box resources"),
        }
        listing
    }

    pub(crate) async fn resource_contents(&self, uri: &str) -> Result<ResourceContents, CoreError> {
        let parsed = ResourceUri::parse(uri)?;
        let body = match &parsed {
            ResourceUri::Shelf(name) => {
                check_name("shelf", name)?;
                let shelf = self.collaborators.shelves.get_shelf(name).await?;
                let boxes = match self.collaborators.shelves.list_boxes(Some(name)).await {
                    Ok(boxes) => to_json(&boxes)?,
                    Err(e) => {
                        debug!(shelf = %name, error = %e, "Falling back to box names");
                        to_json(&shelf.box_names)?
                    }
                };
                json!({
                    "name": shelf.name,
                    "description": shelf.description,
                    "is_current": shelf.is_current,
                    "box_count": shelf.box_count(),
                    "boxes": boxes,
                })
            }
            ResourceUri::Box(name) => {
                check_name("box", name)?;
                to_json(&self.collaborators.shelves.get_box(name).await?)?
            }
        };

        Ok(ResourceContents {
            uri: parsed.to_string(),
            mime_type: JSON_MIME.to_string(),
            text: serde_json::to_string_pretty(&body)
                .map_err(|e| CoreError::Internal(e.to_string()))?,
        })
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, CoreError> {
    serde_json::to_value(value).map_err(|e| CoreError::Internal(e.to_string()))
}

fn probe_status(name: &str, result: Result<(), CollaboratorError>) -> Value {
    match result {
        Ok(()) => json!({ "status": "available" }),
        Err(e) => {
            warn!(collaborator = name, error = %e, "Collaborator health probe failed");
            json!({ "status": "unavailable", "error": e.to_string() })
        }
    }
}

#[async_trait]
impl CapabilityService for ReadOnlyService {
    fn role(&self) -> ServerRole {
        ServerRole::ReadOnly
    }

    fn list_tools(&self) -> &[McpTool] {
        &self.tools
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpResponse, ToolCallError> {
        if name == t::SHELF_DELETE {
            warn!(target: "docbro.security", tool = name, "Prohibited tool called");
            return into_tool_result(Err(CoreError::Prohibited));
        }
        match self.call_read_tool(name, arguments).await {
            Some(result) => into_tool_result(result),
            None if registry::admin_tools().iter().any(|tool| tool.name == name) => {
                warn!(
                    target: "docbro.security",
                    tool = name,
                    "Admin tool called on read-only server"
                );
                Err(ToolCallError::AdminOnly(name.to_string()))
            }
            None => Err(ToolCallError::UnknownTool(name.to_string())),
        }
    }

    async fn list_resources(&self) -> ResourceListing {
        self.resource_listing().await
    }

    async fn read_resource(&self, uri: &str) -> Result<ResourceContents, CoreError> {
        self.resource_contents(uri).await
    }
}
