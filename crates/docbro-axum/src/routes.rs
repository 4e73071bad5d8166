//! Route definitions and router construction.
//!
//! Both servers expose `POST /mcp` (JSON-RPC) and `DELETE /mcp` (session
//! termination), plus a REST surface under `/mcp/v1`.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use docbro_mcp::{AdminService, ReadOnlyService};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::{AdminState, ReadOnlyState};

/// Prefix of the REST surface.
pub const REST_PREFIX: &str = "/mcp/v1";

/// Read-only REST routes, generic over any state that can hand out the
/// read-only service and dispatcher.
fn read_only_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Arc<ReadOnlyService>: axum::extract::FromRef<S>,
{
    Router::new()
        .route("/list_projects", post(handlers::read_only::list_projects))
        .route("/search_projects", post(handlers::read_only::search_projects))
        .route(
            "/get_project_files",
            post(handlers::read_only::get_project_files),
        )
}

fn mcp_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Arc<docbro_mcp::McpDispatcher>: axum::extract::FromRef<S>,
{
    Router::new().route(
        "/mcp",
        post(handlers::mcp::handle).delete(handlers::mcp::close),
    )
}

/// Router for the read-only server.
pub fn read_only_router(service: Arc<ReadOnlyService>) -> Router {
    let state = ReadOnlyState::new(service);

    let rest = read_only_routes().route("/health", get(handlers::read_only::health));

    mcp_routes()
        .nest(REST_PREFIX, rest)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Router for the admin server.
pub fn admin_router(service: Arc<AdminService>) -> Router {
    let state = AdminState::new(service);

    let rest = read_only_routes()
        .route("/execute_command", post(handlers::admin::execute_command))
        .route("/project_create", post(handlers::admin::project_create))
        .route("/project_remove", post(handlers::admin::project_remove))
        .route("/crawl_project", post(handlers::admin::crawl_project))
        .route("/create_shelf", post(handlers::admin::create_shelf))
        .route("/set_current_shelf", post(handlers::admin::set_current_shelf))
        .route("/create_box", post(handlers::admin::create_box))
        .route("/add_basket", post(handlers::admin::add_basket))
        .route("/remove_basket", post(handlers::admin::remove_basket))
        .route("/fill_box", post(handlers::admin::fill_box))
        .route("/delete_shelf", post(handlers::admin::delete_shelf))
        .route("/health", get(handlers::admin::health));

    mcp_routes()
        .nest(REST_PREFIX, rest)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
