//! JSON-RPC 2.0 envelopes and the MCP result shapes the dispatcher emits.
//!
//! Hand-rolled rather than taken from an SDK: the surface is initialize,
//! tools/list, tools/call, prompts/list and notifications.

use crate::schema::InputSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol version answered when the client does not state one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INTERNAL_ERROR: i32 = -32603;

// ─── JSON-RPC 2.0 ───────────────────────────────────────────────────────────

#[derive(Deserialize, Debug, Clone)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.into()),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// Look up a key in `params`; absent or non-object params behave as `{}`.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }
}

/// A response frame. Exactly one of `result` / `error` is serialized.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(JsonRpcError),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Error(JsonRpcError { code, message }),
        }
    }

    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {method}"))
    }

    pub fn tool_not_found(id: Option<Value>, name: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Tool not found: {name}"))
    }

    pub fn execution_error(id: Option<Value>, message: impl std::fmt::Display) -> Self {
        Self::error(id, INTERNAL_ERROR, format!("Tool execution error: {message}"))
    }

    pub fn internal_error(id: Option<Value>, message: impl std::fmt::Display) -> Self {
        Self::error(id, INTERNAL_ERROR, format!("Internal error: {message}"))
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(v) => Some(v),
            Outcome::Error(_) => None,
        }
    }

    pub fn error_object(&self) -> Option<&JsonRpcError> {
        match &self.outcome {
            Outcome::Result(_) => None,
            Outcome::Error(e) => Some(e),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

// ─── MCP Protocol Types ─────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct InitializeResult {
    /// Whatever the client sent, echoed unchanged.
    #[serde(rename = "protocolVersion")]
    pub protocol_version: Value,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Serialize, Debug, Default)]
pub struct ServerCapabilities {
    pub tools: Capability,
    pub prompts: Capability,
}

/// Advertised as `{}`: supported, no sub-options.
#[derive(Serialize, Debug, Default)]
pub struct Capability {}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl ServerInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: InputSchema,
}

#[derive(Serialize, Debug)]
pub struct ToolsListResult {
    pub tools: Vec<ToolDefinition>,
}

#[derive(Serialize, Debug, Default)]
pub struct PromptsListResult {
    pub prompts: Vec<Value>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct ToolCallResult {
    pub content: Vec<ContentBlock>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: String) -> Self {
        Self {
            content_type: "text".into(),
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serializes_result_only() {
        let resp = JsonRpcResponse::success(Some(json!(7)), json!({"ok": true}));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": 7, "result": {"ok": true}}));
    }

    #[test]
    fn test_error_serializes_error_only() {
        let resp = JsonRpcResponse::method_not_found(Some(json!("a")), "bogus");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": "a",
                "error": {"code": -32601, "message": "Method not found: bogus"}
            })
        );
    }

    #[test]
    fn test_missing_id_serializes_as_null() {
        let resp = JsonRpcResponse::internal_error(None, "boom");
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value["id"].is_null());
        assert_eq!(value["error"]["code"], -32603);
    }

    #[test]
    fn test_request_defaults() {
        let req: JsonRpcRequest = serde_json::from_str(r#"{"method":"tools/list"}"#).unwrap();
        assert!(req.id.is_none());
        assert!(req.params.is_null());
        assert!(req.param("name").is_none());
    }

    #[test]
    fn test_capabilities_serialize_as_empty_objects() {
        let caps = serde_json::to_value(ServerCapabilities::default()).unwrap();
        assert_eq!(caps, json!({"tools": {}, "prompts": {}}));
    }
}
