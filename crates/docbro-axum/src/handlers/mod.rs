//! HTTP handlers for the MCP endpoint and the `/mcp/v1` REST surface.

pub mod admin;
pub mod mcp;
pub mod read_only;

use axum::Json;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docbro_core::McpResponse;
use docbro_mcp::services::args::parse_args;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::HttpError;

/// Decode a REST body. An empty body counts as `{}`.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, HttpError> {
    let value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body)
            .map_err(|e| HttpError::BadRequest(format!("Invalid JSON body: {e}")))?
    };
    Ok(parse_args(value)?)
}

/// Wrap a service envelope. Unsuccessful envelopes (a CLI that exited
/// non-zero) are reported as 500.
pub(crate) fn envelope(response: McpResponse) -> Response {
    let status = if response.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(response)).into_response()
}
