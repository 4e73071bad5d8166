//! Domain types for the DocBro MCP server.
//!
//! These are pure data types with no infrastructure dependencies.
//! Request/result objects are owned by a single RPC call; descriptor
//! tables are the only long-lived values.

mod catalog;
mod command;
mod descriptors;
mod file_access;
mod response;

pub use catalog::{
    BoxType, DocBox, ProjectInfo, ProjectQuery, SearchHit, SearchRequest, Shelf,
};
pub use command::{
    CliCommand, CommandExecutionRequest, CommandExecutionSpec, CommandOptions,
    CommandRequestError, CommandState, ExecutionResult, InvalidTransition, OptionValue,
};
pub use descriptors::{McpPrompt, McpResource, McpResourceTemplate, McpTool, PromptArgument};
pub use file_access::{
    FileAccessError, FileAccessRequest, FileAccessType, FileMetadata, ProjectType,
    is_access_allowed,
};
pub use response::{EnvelopeError, McpResponse};
