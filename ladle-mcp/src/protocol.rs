//! JSON-RPC request handling
//!
//! One request per line, one response per line. Requests without an `id`
//! are notifications and get no response.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::tools::{unknown_tool_hint, ToolError, ToolFailure, ToolRegistry};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "ladle";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        RpcError { code, message: message.into(), data: None }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.data = Some(data);
        self
    }
}

impl McpResponse {
    pub fn success(id: Option<JsonValue>, result: JsonValue) -> Self {
        McpResponse { jsonrpc: "2.0".to_string(), id, result: Some(result), error: None }
    }

    pub fn failure(id: Option<JsonValue>, error: RpcError) -> Self {
        McpResponse { jsonrpc: "2.0".to_string(), id, result: None, error: Some(error) }
    }
}

/// Shared state for request handling
pub struct Server {
    pub registry: ToolRegistry,
    pub config: Config,
}

impl Server {
    pub fn new(registry: ToolRegistry, config: Config) -> Self {
        Server { registry, config }
    }

    /// Handle one raw input line; `None` means nothing should be written back
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let raw: JsonValue = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "error parsing request");
                let error = RpcError::new(PARSE_ERROR, format!("Parse error: {}", e));
                return Some(encode(&McpResponse::failure(None, error)));
            }
        };

        // Valid JSON but not a request object
        let id = raw.get("id").filter(|id| !id.is_null()).cloned();
        let request = match serde_json::from_value::<McpRequest>(raw) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "invalid request");
                let error = RpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e));
                return Some(encode(&McpResponse::failure(id, error)));
            }
        };

        let response = self.handle_request(&request);
        // Notifications (no id) should NOT receive a response
        if request.id.is_none() {
            debug!(method = %request.method, "notification processed");
            return None;
        }
        Some(encode(&response))
    }

    pub fn handle_request(&self, request: &McpRequest) -> McpResponse {
        debug!(method = %request.method, "processing");

        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => Ok(handle_initialize(&request.params)),
            "notifications/initialized" | "initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tool_call(&request.params),

            _ => Err(RpcError::new(METHOD_NOT_FOUND, format!("Method not found: {}", request.method))),
        };

        match result {
            Ok(r) => McpResponse::success(request.id.clone(), r),
            Err(e) => McpResponse::failure(request.id.clone(), e),
        }
    }

    fn handle_tools_list(&self) -> JsonValue {
        json!({ "tools": self.registry.list() })
    }

    fn handle_tool_call(&self, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
        let params = params.as_ref().ok_or_else(|| RpcError::invalid_params("Missing params"))?;

        let name = params.get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| RpcError::invalid_params("Missing tool name"))?;

        let tool = self.registry.get(name).ok_or_else(|| {
            let err = RpcError::invalid_params(format!("Unknown tool: {}", name));
            match unknown_tool_hint(&self.registry, name) {
                Some(hint) => err.with_data(json!({ "suggestion": hint })),
                None => err,
            }
        })?;

        let args = params.get("arguments").cloned().unwrap_or(json!({}));

        match tool.call(&args, &self.config) {
            Ok(output) => Ok(json!({
                "content": [{ "type": "text", "text": output.text }],
                "structuredContent": output.data,
                "isError": false
            })),
            Err(ToolFailure::InvalidArgs(msg)) => {
                warn!(tool = name, error = %msg, "invalid tool arguments");
                Err(RpcError::invalid_params(msg))
            }
            Err(ToolFailure::Kitchen(e)) => {
                debug!(tool = name, error = %e, "tool reported an error");
                let error = ToolError::from(&e);
                Ok(json!({
                    "content": [{ "type": "text", "text": e.to_string() }],
                    "structuredContent": { "error": error },
                    "isError": true
                }))
            }
        }
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> JsonValue {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    json!({
        "protocolVersion": client_protocol,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION
        },
        "instructions": "Kitchen unit conversion. Unit names are case-sensitive (\"L\", not \"l\"). \
                         Use convert_to_system to show an amount in metric or imperial."
    })
}

/// Serialize a response; falls back to a fixed internal error line
pub fn encode(response: &McpResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        warn!(error = %e, "failed to serialize response");
        format!(
            r#"{{"jsonrpc":"2.0","error":{{"code":{},"message":"Internal error"}}}}"#,
            INTERNAL_ERROR
        )
    })
}
