//! JSON-RPC 2.0 envelope types and MCP protocol constants.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol versions this server speaks, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2025-06-18", "2025-03-26", "2024-11-05"];

pub const LATEST_PROTOCOL_VERSION: &str = SUPPORTED_PROTOCOL_VERSIONS[0];

/// JSON-RPC and MCP error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const SERVER_NOT_INITIALIZED: i64 = -32002;
}

/// Pick the version to answer an `initialize` with: the client's when we
/// support it, otherwise our newest.
pub fn negotiate_version(requested: &str) -> &'static str {
    SUPPORTED_PROTOCOL_VERSIONS
        .into_iter()
        .find(|v| *v == requested)
        .unwrap_or(LATEST_PROTOCOL_VERSION)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(error_codes::PARSE_ERROR, format!("Parse error: {detail}"))
    }

    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::new(error_codes::INVALID_REQUEST, detail)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
        )
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self::new(error_codes::INVALID_PARAMS, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, detail)
    }

    pub fn not_initialized() -> Self {
        Self::new(
            error_codes::SERVER_NOT_INITIALIZED,
            "Server not initialized: call 'initialize' first",
        )
    }
}

/// A validated inbound request or notification.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    /// `None` for notifications.
    pub id: Option<Value>,
    pub method: String,
    pub params: Value,
}

impl JsonRpcRequest {
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Validate a decoded JSON value as a JSON-RPC 2.0 message.
    ///
    /// On failure returns the id to answer with (when one could be read)
    /// and the error.
    pub fn from_value(value: Value) -> Result<Self, (Value, JsonRpcError)> {
        let Value::Object(mut obj) = value else {
            return Err((
                Value::Null,
                JsonRpcError::invalid_request("Invalid request: expected a JSON object"),
            ));
        };

        let id = obj.remove("id");
        let reply_id = id.clone().unwrap_or(Value::Null);
        if let Some(bad) = id
            .as_ref()
            .filter(|v| !(v.is_string() || v.is_number() || v.is_null()))
        {
            return Err((
                Value::Null,
                JsonRpcError::invalid_request(format!("Invalid request: bad id {bad}")),
            ));
        }

        if obj.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err((
                reply_id,
                JsonRpcError::invalid_request("Invalid request: jsonrpc must be \"2.0\""),
            ));
        }

        let method = match obj.remove("method") {
            Some(Value::String(m)) if !m.is_empty() => m,
            _ => {
                return Err((
                    reply_id,
                    JsonRpcError::invalid_request("Invalid request: missing method"),
                ));
            }
        };

        let params = obj.remove("params").unwrap_or(Value::Null);
        if !(params.is_object() || params.is_array() || params.is_null()) {
            return Err((
                reply_id,
                JsonRpcError::invalid_request("Invalid request: params must be an object or array"),
            ));
        }

        Ok(Self { id, method, params })
    }
}

/// Outbound response. Both `result` and `error` are always serialized;
/// exactly one of them is non-null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    pub result: Option<Value>,
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn error_code(&self) -> Option<i64> {
        self.error.as_ref().map(|e| e.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_request_and_notification() {
        let req = JsonRpcRequest::from_value(json!({
            "jsonrpc": "2.0", "id": 7, "method": "tools/list"
        }))
        .unwrap();
        assert_eq!(req.id, Some(json!(7)));
        assert!(req.params.is_null());

        let note = JsonRpcRequest::from_value(json!({
            "jsonrpc": "2.0", "method": "notifications/initialized"
        }))
        .unwrap();
        assert!(note.is_notification());
    }

    #[test]
    fn rejects_malformed_envelopes() {
        let (id, err) =
            JsonRpcRequest::from_value(json!({"jsonrpc": "2.0", "id": "a"})).unwrap_err();
        assert_eq!(id, json!("a"));
        assert_eq!(err.code, error_codes::INVALID_REQUEST);

        let (_, err) =
            JsonRpcRequest::from_value(json!({"jsonrpc": "1.0", "id": 1, "method": "ping"}))
                .unwrap_err();
        assert_eq!(err.code, error_codes::INVALID_REQUEST);

        let (_, err) = JsonRpcRequest::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(err.code, error_codes::INVALID_REQUEST);

        let (_, err) = JsonRpcRequest::from_value(
            json!({"jsonrpc": "2.0", "id": 1, "method": "ping", "params": 3}),
        )
        .unwrap_err();
        assert_eq!(err.code, error_codes::INVALID_REQUEST);
    }

    #[test]
    fn response_serializes_both_fields() {
        let ok = serde_json::to_value(JsonRpcResponse::success(json!(1), json!({}))).unwrap();
        assert_eq!(ok["error"], Value::Null);
        assert_eq!(ok["jsonrpc"], "2.0");

        let err = serde_json::to_value(JsonRpcResponse::failure(
            json!(1),
            JsonRpcError::not_initialized(),
        ))
        .unwrap();
        assert_eq!(err["result"], Value::Null);
        assert_eq!(err["error"]["code"], -32002);
    }

    #[test]
    fn version_negotiation() {
        assert_eq!(negotiate_version("2024-11-05"), "2024-11-05");
        assert_eq!(negotiate_version("1999-01-01"), LATEST_PROTOCOL_VERSION);
    }
}
