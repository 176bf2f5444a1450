//! MCP JSON-RPC 2.0 request dispatch, independent of transport.

use super::protocol::{
    CallToolResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION,
};
use super::tools::ToolRegistry;
use crate::config::ServerConfig;
use serde::Serialize;
use serde_json::{json, Value};

/// Reply to one incoming message: a single response or a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Single(JsonRpcResponse),
    Batch(Vec<JsonRpcResponse>),
}

/// MCP server holding the tool registry and server identity.
pub struct McpServer {
    name: String,
    version: String,
    instructions: Option<String>,
    tools: ToolRegistry,
}

type MethodResult = std::result::Result<Value, JsonRpcError>;

impl McpServer {
    /// Create a new MCP server with the built-in tools.
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_tools(config, ToolRegistry::with_defaults())
    }

    /// Create a server with a custom registry.
    pub fn with_tools(config: &ServerConfig, tools: ToolRegistry) -> Self {
        Self {
            name: config.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instructions: config.instructions.clone(),
            tools,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle one raw message. Returns `None` when nothing should be sent back.
    pub async fn handle_message(&self, raw: &str) -> Option<Reply> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => self.handle_value(value).await,
            Err(e) => {
                tracing::warn!("Failed to parse message: {}", e);
                Some(Reply::Single(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::parse_error(e),
                )))
            }
        }
    }

    /// Handle an already-parsed message, which may be a batch.
    pub async fn handle_value(&self, value: Value) -> Option<Reply> {
        match value {
            Value::Array(items) => {
                if items.is_empty() {
                    return Some(Reply::Single(JsonRpcResponse::failure(
                        Value::Null,
                        JsonRpcError::invalid_request("empty batch"),
                    )));
                }

                let mut responses = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(response) = self.handle_single(item).await {
                        responses.push(response);
                    }
                }

                if responses.is_empty() {
                    None
                } else {
                    Some(Reply::Batch(responses))
                }
            }
            other => self.handle_single(other).await.map(Reply::Single),
        }
    }

    async fn handle_single(&self, value: Value) -> Option<JsonRpcResponse> {
        let id = value.get("id").cloned().unwrap_or(Value::Null);

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Invalid request: {}", e);
                return Some(JsonRpcResponse::failure(id, JsonRpcError::invalid_request(e)));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::invalid_request(format!(
                    "unsupported jsonrpc version {:?}",
                    request.jsonrpc
                )),
            ));
        }

        self.handle_request(request).await
    }

    /// Dispatch a request. Notifications never produce a response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            tracing::debug!("Notification received: {}", request.method);
            return None;
        };

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(),
            "ping" => Ok(json!({})),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request.params).await,
            "resources/list" => Ok(json!({ "resources": [] })),
            "resources/templates/list" => Ok(json!({ "resourceTemplates": [] })),
            "prompts/list" => Ok(json!({ "prompts": [] })),
            _ => {
                tracing::debug!("Method not found: {}", request.method);
                Err(JsonRpcError::method_not_found(&request.method))
            }
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    fn handle_initialize(&self) -> MethodResult {
        let mut result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false },
                "prompts": { "listChanged": false }
            },
            "serverInfo": {
                "name": self.name,
                "version": self.version
            }
        });

        if let Some(instructions) = &self.instructions {
            result["instructions"] = json!(instructions);
        }

        Ok(result)
    }

    fn handle_tools_list(&self) -> MethodResult {
        Ok(json!({ "tools": self.tools.definitions() }))
    }

    async fn handle_tools_call(&self, params: Value) -> MethodResult {
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| JsonRpcError::invalid_params("Missing tool name"))?;

        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or(json!({}));

        let result = match self.tools.get(name) {
            Some(tool) => match tool.call(arguments).await {
                Ok(text) => CallToolResult::text(text),
                Err(e) => {
                    tracing::warn!("Tool {} failed: {}", name, e);
                    CallToolResult::error(e.to_string())
                }
            },
            None => {
                tracing::debug!("Unknown tool: {}", name);
                CallToolResult::error(format!("Unknown tool: {}", name))
            }
        };

        serde_json::to_value(result).map_err(JsonRpcError::internal)
    }
}
