#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod security;
pub mod services;
pub mod settings;

// Dev-dependency used only by integration tests.
#[cfg(test)]
use tempfile as _;

// Re-export commonly used types for convenience
pub use domain::{
    BoxType, CliCommand, CommandExecutionRequest, CommandExecutionSpec, CommandOptions,
    CommandRequestError, CommandState, DocBox, EnvelopeError, ExecutionResult, FileAccessError,
    FileAccessRequest, FileAccessType, FileMetadata, InvalidTransition, McpPrompt, McpResource,
    McpResourceTemplate, McpResponse, McpTool, OptionValue, ProjectInfo, ProjectQuery,
    ProjectType, PromptArgument, SearchHit, SearchRequest, Shelf, is_access_allowed,
};
pub use ports::{
    CollaboratorError, Collaborators, CoreError, ProjectCatalogPort, SearchPort, ShelfCatalogPort,
};
pub use security::{CommandRejection, NameError};
pub use services::FileAccessController;
pub use settings::{
    DEFAULT_ADMIN_PORT, DEFAULT_CLI_PATH, DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_HOST,
    DEFAULT_READ_ONLY_PORT, ExecutorSettings, MAX_COMMAND_TIMEOUT_SECS, MIN_COMMAND_TIMEOUT_SECS,
    SettingsError, validate_settings,
};
