//! The `McpResponse` envelope returned by every service operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("a successful response must not carry an error")]
    SuccessWithError,

    #[error("a failed response must carry an error")]
    FailureWithoutError,
}

/// Standard response envelope.
///
/// `error` is present exactly when `success` is false. The invariant holds
/// for every constructor and for deserialized values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResponse")]
pub struct McpResponse {
    success: bool,
    data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
}

impl McpResponse {
    pub fn new(
        success: bool,
        data: Value,
        error: Option<String>,
        metadata: Option<Value>,
    ) -> Result<Self, EnvelopeError> {
        match (success, &error) {
            (true, Some(_)) => Err(EnvelopeError::SuccessWithError),
            (false, None) => Err(EnvelopeError::FailureWithoutError),
            _ => Ok(Self {
                success,
                data,
                error,
                metadata,
            }),
        }
    }

    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
            metadata: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            error: Some(message.into()),
            metadata: None,
        }
    }

    /// Failure that still carries a payload, e.g. a failed execution result.
    pub fn error_with_data(message: impl Into<String>, data: Value) -> Self {
        Self {
            data,
            ..Self::error(message)
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub const fn is_success(&self) -> bool {
        self.success
    }

    pub const fn data(&self) -> &Value {
        &self.data
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    /// Serialize to a JSON value. The envelope holds only JSON values, so
    /// this cannot fail in practice; a failure degrades to `Null`.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Deserialize)]
struct RawResponse {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    metadata: Option<Value>,
}

impl TryFrom<RawResponse> for McpResponse {
    type Error = EnvelopeError;

    fn try_from(raw: RawResponse) -> Result<Self, Self::Error> {
        Self::new(raw.success, raw.data, raw.error, raw.metadata)
    }
}
