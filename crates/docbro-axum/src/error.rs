//! Axum-specific error types and mappings.
//!
//! Every error body is an `McpResponse` envelope with `success: false`, so
//! REST clients parse one shape for success and failure alike.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docbro_core::{CollaboratorError, CoreError, McpResponse};
use serde_json::json;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input or a rejected command).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Named entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Never allowed through this server.
    #[error("operation_prohibited")]
    Prohibited,

    /// Internal server error, including collaborator failures.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Prohibited => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable discriminant for client-side handling.
    const fn error_type(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::Prohibited => "operation_prohibited",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::Internal(msg) => msg.clone(),
            Self::Prohibited => self.to_string(),
        };
        let body = McpResponse::error(message).with_metadata(json!({
            "status": status.as_u16(),
            "type": self.error_type(),
        }));

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) | CoreError::Security(msg) => Self::BadRequest(msg),
            CoreError::Prohibited => Self::Prohibited,
            CoreError::Collaborator(CollaboratorError::NotFound(msg)) => Self::NotFound(msg),
            CoreError::Collaborator(CollaboratorError::InvalidArgument(msg)) => {
                Self::BadRequest(msg)
            }
            CoreError::Collaborator(other) => Self::Internal(other.to_string()),
            CoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}
