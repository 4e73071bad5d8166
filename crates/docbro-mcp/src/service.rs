//! The capability surface a dispatcher is bound to.

use async_trait::async_trait;
use docbro_core::{CoreError, McpPrompt, McpResource, McpResourceTemplate, McpResponse, McpTool};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::registry;

/// Which side of the read/write partition a service sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServerRole {
    ReadOnly,
    Admin,
}

impl ServerRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::Admin => "admin",
        }
    }

    /// Name reported in `initialize`'s `serverInfo`.
    pub const fn server_name(self) -> &'static str {
        match self {
            Self::ReadOnly => "docbro-read-only",
            Self::Admin => "docbro-admin",
        }
    }
}

impl fmt::Display for ServerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of `resources/list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceListing {
    pub resources: Vec<McpResource>,
    pub shelf_count: usize,
    pub box_count: usize,
}

/// One entry of a `resources/read` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// Tool calls the dispatcher answers with a JSON-RPC error instead of a
/// tool result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool '{0}' is only available on the admin server")]
    AdminOnly(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Turn a service outcome into a tool outcome.
///
/// Bad input becomes a protocol error; prohibited operations and
/// collaborator failures become an `isError` tool result carrying the
/// message.
pub fn into_tool_result(
    result: Result<McpResponse, CoreError>,
) -> Result<McpResponse, ToolCallError> {
    match result {
        Ok(response) => Ok(response),
        Err(CoreError::Validation(msg) | CoreError::Security(msg)) => {
            Err(ToolCallError::InvalidArguments(msg))
        }
        Err(e) => Ok(McpResponse::error(e.to_string())),
    }
}

/// Operations a dispatcher routes to.
#[async_trait]
pub trait CapabilityService: Send + Sync {
    fn role(&self) -> ServerRole;

    /// The static tool catalog for this role.
    fn list_tools(&self) -> &[McpTool];

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpResponse, ToolCallError>;

    /// Shelf and box resources. Collaborator failures drop the affected
    /// kind from the listing rather than failing it.
    async fn list_resources(&self) -> ResourceListing;

    async fn read_resource(&self, uri: &str) -> Result<ResourceContents, CoreError>;

    fn list_resource_templates(&self) -> Vec<McpResourceTemplate> {
        registry::resource_templates()
    }

    fn list_prompts(&self) -> Vec<McpPrompt> {
        registry::prompts()
    }

    fn get_prompt(&self, name: &str, arguments: &Map<String, Value>) -> Result<Value, CoreError> {
        registry::render_prompt(name, arguments)
    }
}
