//! Shared application state types.
//!
//! Each server gets its own state; both expose their dispatcher through
//! [`FromRef`] so the `/mcp` handlers are shared.

use std::sync::Arc;

use axum::extract::FromRef;
use docbro_mcp::{AdminService, McpDispatcher, ReadOnlyService};

/// State for the read-only server.
#[derive(Clone)]
pub struct ReadOnlyState {
    pub dispatcher: Arc<McpDispatcher>,
    pub service: Arc<ReadOnlyService>,
}

impl ReadOnlyState {
    pub fn new(service: Arc<ReadOnlyService>) -> Self {
        Self {
            dispatcher: Arc::new(McpDispatcher::new(service.clone())),
            service,
        }
    }
}

/// State for the admin server.
#[derive(Clone)]
pub struct AdminState {
    pub dispatcher: Arc<McpDispatcher>,
    pub service: Arc<AdminService>,
}

impl AdminState {
    pub fn new(service: Arc<AdminService>) -> Self {
        Self {
            dispatcher: Arc::new(McpDispatcher::new(service.clone())),
            service,
        }
    }
}

impl FromRef<ReadOnlyState> for Arc<McpDispatcher> {
    fn from_ref(state: &ReadOnlyState) -> Self {
        Arc::clone(&state.dispatcher)
    }
}

impl FromRef<AdminState> for Arc<McpDispatcher> {
    fn from_ref(state: &AdminState) -> Self {
        Arc::clone(&state.dispatcher)
    }
}

impl FromRef<ReadOnlyState> for Arc<ReadOnlyService> {
    fn from_ref(state: &ReadOnlyState) -> Self {
        Arc::clone(&state.service)
    }
}

impl FromRef<AdminState> for Arc<ReadOnlyService> {
    fn from_ref(state: &AdminState) -> Self {
        Arc::clone(state.service.read_only())
    }
}
