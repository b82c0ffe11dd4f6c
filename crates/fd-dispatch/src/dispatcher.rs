use crate::adapter::adapt;
use crate::error::ToolError;
use crate::protocol::*;
use crate::registry::ToolRegistry;
use crate::schema::synthesize;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinError;

/// JSON-RPC methods the dispatcher understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Initialize,
    Initialized,
    /// Any other `notifications/*` method.
    Notification(String),
    ToolsList,
    ToolsCall,
    PromptsList,
    Unknown(String),
}

impl Method {
    pub fn parse(method: &str) -> Self {
        match method {
            "initialize" => Self::Initialize,
            "notifications/initialized" => Self::Initialized,
            "tools/list" => Self::ToolsList,
            "tools/call" => Self::ToolsCall,
            "prompts/list" => Self::PromptsList,
            m if m.starts_with("notifications/") => Self::Notification(m.to_string()),
            m => Self::Unknown(m.to_string()),
        }
    }

    pub fn is_notification(&self) -> bool {
        matches!(self, Self::Initialized | Self::Notification(_))
    }
}

/// Routes JSON-RPC requests to the registry. Stateless between messages.
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    server_info: ServerInfo,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, server_info: ServerInfo) -> Self {
        Self {
            registry,
            server_info,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Dispatch one raw message. `None` means nothing is sent back.
    pub async fn dispatch_str(&self, raw: &str) -> Option<JsonRpcResponse> {
        self.dispatch_slice(raw.as_bytes()).await
    }

    /// Like [`Dispatcher::dispatch_str`] for undecoded bytes. Invalid UTF-8
    /// is answered with an internal error, same as malformed JSON.
    pub async fn dispatch_slice(&self, raw: &[u8]) -> Option<JsonRpcResponse> {
        match serde_json::from_slice::<Value>(raw) {
            Ok(value) => self.dispatch_value(value).await,
            Err(e) => {
                tracing::warn!("Unparseable message: {e}");
                Some(JsonRpcResponse::internal_error(None, e))
            }
        }
    }

    pub async fn dispatch_value(&self, raw: Value) -> Option<JsonRpcResponse> {
        let id = raw.get("id").filter(|id| !id.is_null()).cloned();
        match serde_json::from_value::<JsonRpcRequest>(raw) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                tracing::warn!("Malformed request: {e}");
                Some(JsonRpcResponse::internal_error(id, e))
            }
        }
    }

    pub async fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let method = Method::parse(&request.method);
        tracing::info!("Handling method: {}", request.method);

        let id = request.id.clone();
        let response = match method {
            Method::Initialize => {
                let protocol_version = request
                    .param("protocolVersion")
                    .cloned()
                    .unwrap_or_else(|| Value::from(DEFAULT_PROTOCOL_VERSION));
                respond(
                    id,
                    InitializeResult {
                        protocol_version,
                        capabilities: ServerCapabilities::default(),
                        server_info: self.server_info.clone(),
                    },
                )
            }

            Method::Initialized | Method::Notification(_) => return None,

            Method::ToolsList => respond(
                id,
                ToolsListResult {
                    tools: self.tool_definitions(),
                },
            ),

            Method::ToolsCall => self.call_tool(id, &request.params).await,

            Method::PromptsList => respond(id, PromptsListResult::default()),

            Method::Unknown(name) => {
                tracing::warn!("Unknown method: {name}");
                JsonRpcResponse::method_not_found(id, &name)
            }
        };
        Some(response)
    }

    /// Definitions advertised by `tools/list`, in registration order.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.registry
            .list_all()
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.surfaced_description(),
                input_schema: synthesize(tool),
            })
            .collect()
    }

    async fn call_tool(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let name = params.get("name").and_then(Value::as_str);
        let Some(tool) = name.and_then(|n| self.registry.lookup(n)) else {
            let name = name.unwrap_or("(missing name)");
            tracing::warn!("Tool not found: {name}");
            return JsonRpcResponse::tool_not_found(id, name);
        };
        let name = tool.name();

        let raw_args = params.get("arguments").cloned().unwrap_or(Value::Null);
        let args = match tool.bind_arguments(raw_args) {
            Ok(args) => args,
            Err(e) => {
                tracing::error!("Tool '{name}' rejected its arguments: {e}");
                return JsonRpcResponse::execution_error(id, e);
            }
        };

        tracing::info!("Calling tool: {name}");
        let handler = tool.handler();
        let outcome = tokio::spawn(async move { handler.call(args).await })
            .await
            .unwrap_or_else(|e| Err(ToolError::Panicked(join_failure(e))));

        match outcome {
            Ok(output) => respond(id, ToolCallResult { content: adapt(output) }),
            Err(e) => {
                tracing::error!("Tool '{name}' failed: {e}");
                JsonRpcResponse::execution_error(id, e)
            }
        }
    }
}

fn respond(id: Option<Value>, payload: impl Serialize) -> JsonRpcResponse {
    match serde_json::to_value(payload) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::internal_error(id, e),
    }
}

fn join_failure(err: JoinError) -> String {
    if !err.is_panic() {
        return "task was cancelled".into();
    }
    let payload = err.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("initialize"), Method::Initialize);
        assert_eq!(Method::parse("notifications/initialized"), Method::Initialized);
        assert_eq!(
            Method::parse("notifications/cancelled"),
            Method::Notification("notifications/cancelled".into())
        );
        assert_eq!(Method::parse("tools/list"), Method::ToolsList);
        assert_eq!(Method::parse("tools/call"), Method::ToolsCall);
        assert_eq!(Method::parse("prompts/list"), Method::PromptsList);
        assert_eq!(Method::parse("resources/list"), Method::Unknown("resources/list".into()));
        assert_eq!(Method::parse(""), Method::Unknown(String::new()));
    }

    #[test]
    fn test_notification_classification() {
        assert!(Method::parse("notifications/initialized").is_notification());
        assert!(Method::parse("notifications/progress").is_notification());
        assert!(!Method::parse("initialized").is_notification());
        assert!(!Method::parse("tools/list").is_notification());
    }

    #[tokio::test]
    async fn test_unparseable_message() {
        let dispatcher = Dispatcher::new(Arc::new(ToolRegistry::new()), ServerInfo::new("t", "0"));
        let resp = dispatcher.dispatch_str("{not json").await.unwrap();
        assert!(resp.id.is_none());
        let err = resp.error_object().unwrap();
        assert_eq!(err.code, INTERNAL_ERROR);
        assert!(err.message.starts_with("Internal error: "));
    }

    #[tokio::test]
    async fn test_invalid_utf8_message() {
        let dispatcher = Dispatcher::new(Arc::new(ToolRegistry::new()), ServerInfo::new("t", "0"));
        let resp = dispatcher.dispatch_slice(b"\xff\xfe").await.unwrap();
        assert!(resp.id.is_none());
        assert_eq!(resp.error_object().unwrap().code, INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_malformed_request_salvages_id() {
        let dispatcher = Dispatcher::new(Arc::new(ToolRegistry::new()), ServerInfo::new("t", "0"));
        let resp = dispatcher
            .dispatch_str(r#"{"jsonrpc":"2.0","id":9,"method":42}"#)
            .await
            .unwrap();
        assert_eq!(resp.id, Some(Value::from(9)));
        assert_eq!(resp.error_object().unwrap().code, INTERNAL_ERROR);
    }
}
