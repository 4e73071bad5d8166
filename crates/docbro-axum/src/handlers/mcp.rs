//! Streamable-HTTP style MCP endpoint: one JSON-RPC message per POST.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use docbro_mcp::{DispatchOutcome, McpDispatcher};
use tracing::warn;

/// Header carrying the session opened by `initialize`.
pub const SESSION_HEADER: &str = "mcp-session-id";

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Handle one JSON-RPC request or notification.
pub async fn handle(
    State(dispatcher): State<Arc<McpDispatcher>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match dispatcher.handle(session_id(&headers), &body).await {
        DispatchOutcome::Accepted => StatusCode::ACCEPTED.into_response(),
        DispatchOutcome::Reply {
            response,
            session_id: opened,
        } => {
            let mut reply = Json(response).into_response();
            if let Some(id) = opened {
                match HeaderValue::from_str(&id) {
                    Ok(value) => {
                        reply.headers_mut().insert(SESSION_HEADER, value);
                    }
                    Err(e) => warn!(error = %e, "Session id is not a valid header value"),
                }
            }
            reply
        }
    }
}

/// Terminate the session named by the `Mcp-Session-Id` header.
pub async fn close(
    State(dispatcher): State<Arc<McpDispatcher>>,
    headers: HeaderMap,
) -> StatusCode {
    match session_id(&headers) {
        None => StatusCode::BAD_REQUEST,
        Some(id) if dispatcher.close_session(id) => StatusCode::NO_CONTENT,
        Some(_) => StatusCode::NOT_FOUND,
    }
}
