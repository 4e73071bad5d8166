#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod dispatcher;
pub mod protocol;
pub mod registry;
pub mod service;
pub mod services;
pub mod session;

// Dev-dependencies exercised only by the integration tests.
#[cfg(test)]
use chrono as _;
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tempfile as _;

pub use dispatcher::{DispatchOutcome, McpDispatcher};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, error_codes};
pub use service::{CapabilityService, ResourceContents, ResourceListing, ServerRole, ToolCallError};
pub use services::{AdminService, ReadOnlyService};
pub use session::SessionRegistry;
