//! Routes MCP JSON-RPC requests to a capability service.

use std::sync::Arc;

use docbro_core::{CollaboratorError, CoreError};
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, negotiate_version};
use crate::service::CapabilityService;
use crate::session::SessionRegistry;

/// What the transport should send back for one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A JSON-RPC response. `session_id` is set when `initialize` opened a
    /// session the client should echo in `Mcp-Session-Id`.
    Reply {
        response: JsonRpcResponse,
        session_id: Option<String>,
    },
    /// A notification was accepted; there is nothing to answer.
    Accepted,
}

impl DispatchOutcome {
    fn reply(response: JsonRpcResponse) -> Self {
        Self::Reply {
            response,
            session_id: None,
        }
    }

    pub fn response(&self) -> Option<&JsonRpcResponse> {
        match self {
            Self::Reply { response, .. } => Some(response),
            Self::Accepted => None,
        }
    }
}

pub struct McpDispatcher {
    service: Arc<dyn CapabilityService>,
    sessions: SessionRegistry,
}

impl McpDispatcher {
    pub fn new(service: Arc<dyn CapabilityService>) -> Self {
        Self {
            service,
            sessions: SessionRegistry::new(),
        }
    }

    pub fn service(&self) -> &Arc<dyn CapabilityService> {
        &self.service
    }

    pub const fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Handle one raw message body.
    pub async fn handle(&self, session: Option<&str>, body: &[u8]) -> DispatchOutcome {
        let value = match serde_json::from_slice::<Value>(body) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "Unparseable JSON-RPC body");
                return DispatchOutcome::reply(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::parse_error(e),
                ));
            }
        };
        self.handle_value(session, value).await
    }

    /// Handle an already-decoded message.
    pub async fn handle_value(&self, session: Option<&str>, value: Value) -> DispatchOutcome {
        let request = match JsonRpcRequest::from_value(value) {
            Ok(request) => request,
            Err((id, error)) => {
                return DispatchOutcome::reply(JsonRpcResponse::failure(id, error));
            }
        };

        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "Notification received");
            return DispatchOutcome::Accepted;
        };

        match request.method.as_str() {
            "initialize" => self.initialize(session, id, &request.params),
            "ping" => DispatchOutcome::reply(JsonRpcResponse::success(id, json!({}))),
            method => {
                if !self.sessions.is_initialized(session) {
                    debug!(method, "Request before initialize");
                    return DispatchOutcome::reply(JsonRpcResponse::failure(
                        id,
                        JsonRpcError::not_initialized(),
                    ));
                }
                let response = match self.route(method, request.params).await {
                    Ok(result) => JsonRpcResponse::success(id, result),
                    Err(error) => JsonRpcResponse::failure(id, error),
                };
                DispatchOutcome::reply(response)
            }
        }
    }

    /// Forget a session (transport-level termination).
    pub fn close_session(&self, session_id: &str) -> bool {
        self.sessions.close(session_id)
    }

    fn initialize(&self, session: Option<&str>, id: Value, params: &Value) -> DispatchOutcome {
        let Some(requested) = params.get("protocolVersion").and_then(Value::as_str) else {
            return DispatchOutcome::reply(JsonRpcResponse::failure(
                id,
                JsonRpcError::invalid_params("protocolVersion must be a string"),
            ));
        };
        if params
            .get("capabilities")
            .is_some_and(|capabilities| !capabilities.is_object())
        {
            return DispatchOutcome::reply(JsonRpcResponse::failure(
                id,
                JsonRpcError::invalid_params("capabilities must be an object"),
            ));
        }

        let version = negotiate_version(requested);
        let session_id = self.sessions.open();
        if session.is_none() {
            self.sessions.mark_anonymous_initialized();
        }

        let role = self.service.role();
        let client = params
            .pointer("/clientInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(
            role = %role,
            client,
            requested,
            negotiated = version,
            "MCP session initialized"
        );

        DispatchOutcome::Reply {
            response: JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": version,
                    "capabilities": {
                        "tools": {"listChanged": false},
                        "resources": {"subscribe": false, "listChanged": false},
                        "prompts": {"listChanged": false},
                    },
                    "serverInfo": {
                        "name": role.server_name(),
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            ),
            session_id: Some(session_id),
        }
    }

    async fn route(&self, method: &str, params: Value) -> Result<Value, JsonRpcError> {
        match method {
            "tools/list" => Ok(json!({ "tools": self.service.list_tools() })),
            "tools/call" => self.call_tool(params).await,
            "resources/list" => {
                let listing = self.service.list_resources().await;
                Ok(json!({
                    "resources": listing.resources,
                    "_meta": {
                        "shelf_count": listing.shelf_count,
                        "box_count": listing.box_count,
                    },
                }))
            }
            "resources/read" => {
                let uri = string_param(&params, "uri")?;
                match self.service.read_resource(uri).await {
                    Ok(contents) => Ok(json!({ "contents": [contents] })),
                    Err(e) => Err(resource_error(&e)),
                }
            }
            "resources/templates/list" => Ok(json!({
                "resourceTemplates": self.service.list_resource_templates(),
            })),
            "prompts/list" => Ok(json!({ "prompts": self.service.list_prompts() })),
            "prompts/get" => {
                let name = string_param(&params, "name")?;
                let empty = Map::new();
                let arguments = match params.get("arguments") {
                    None | Some(Value::Null) => &empty,
                    Some(Value::Object(arguments)) => arguments,
                    Some(_) => {
                        return Err(JsonRpcError::invalid_params("arguments must be an object"));
                    }
                };
                self.service
                    .get_prompt(name, arguments)
                    .map_err(|e| JsonRpcError::invalid_params(e.to_string()))
            }
            other => Err(JsonRpcError::method_not_found(other)),
        }
    }

    async fn call_tool(&self, params: Value) -> Result<Value, JsonRpcError> {
        let name = string_param(&params, "name")?.to_string();
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
        if !(arguments.is_object() || arguments.is_null()) {
            return Err(JsonRpcError::invalid_params("arguments must be an object"));
        }

        let response = self
            .service
            .call_tool(&name, arguments)
            .await
            .map_err(|e| {
                debug!(tool = %name, error = %e, "Tool call refused");
                JsonRpcError::invalid_params(e.to_string())
            })?;

        let text = serde_json::to_string(&response)
            .map_err(|e| JsonRpcError::internal(e.to_string()))?;
        Ok(json!({
            "content": [{"type": "text", "text": text}],
            "isError": !response.is_success(),
        }))
    }
}

fn string_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, JsonRpcError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| JsonRpcError::invalid_params(format!("{key} must be a string")))
}

fn resource_error(error: &CoreError) -> JsonRpcError {
    match error {
        CoreError::Validation(_)
        | CoreError::Security(_)
        | CoreError::Collaborator(
            CollaboratorError::NotFound(_) | CollaboratorError::InvalidArgument(_),
        ) => JsonRpcError::invalid_params(error.to_string()),
        other => {
            warn!(error = %other, "Resource read failed");
            JsonRpcError::internal(other.to_string())
        }
    }
}
