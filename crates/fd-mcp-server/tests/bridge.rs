use fd_dispatch::{
    handler_fn, Arguments, DeclaredType, Dispatcher, ParamSpec, ServerInfo, ToolDescriptor,
    ToolError, ToolOutput, ToolRegistry,
};
use fd_mcp_server::{http, AuthPolicy, Bridge, ServerError};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const KEY: &str = "bridge-key";

fn dispatcher() -> Arc<Dispatcher> {
    let mut registry = ToolRegistry::new();
    registry
        .register(
            ToolDescriptor::new(
                "echo",
                handler_fn(|args: Arguments| async move {
                    Ok::<_, ToolError>(ToolOutput::Text(args.str("text")?.to_string()))
                }),
            )
            .with_description("Echo the given text back")
            .with_param(ParamSpec::required("text", DeclaredType::Str)),
        )
        .unwrap();
    Arc::new(Dispatcher::new(
        Arc::new(registry),
        ServerInfo::new("freshdesk-mcp", "test"),
    ))
}

/// Starts the HTTP transport on an ephemeral port and returns its `/mcp` URL.
async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = http::router(dispatcher(), AuthPolicy::Bearer(KEY.into()));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/mcp")
}

async fn closed_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/mcp")
}

fn bridge(endpoint: &str, key: Option<&str>) -> Bridge {
    Bridge::new(endpoint, key.map(String::from), Duration::from_secs(5)).unwrap()
}

async fn relay(bridge: &Bridge, input: &str) -> Vec<Value> {
    let out = bridge.run(input.as_bytes(), Vec::new()).await.unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[tokio::test]
async fn test_relays_session_in_order() {
    let endpoint = start_server().await;
    let bridge = bridge(&endpoint, Some(KEY));
    bridge.check_health().await.unwrap();

    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"echo","arguments":{"text":"over the wire"}}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"nope"}}"#,
        "\n",
    );
    let responses = relay(&bridge, input).await;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "freshdesk-mcp");
    assert_eq!(responses[1]["result"]["content"][0]["text"], "over the wire");
    assert_eq!(responses[2]["error"]["code"], -32601);
    assert_eq!(responses[2]["error"]["message"], "Tool not found: nope");
}

#[tokio::test]
async fn test_rejected_key_becomes_error_with_id() {
    let endpoint = start_server().await;
    let bridge = bridge(&endpoint, Some("wrong"));

    let line = bridge
        .relay_line(r#"{"jsonrpc":"2.0","id":"abc","method":"tools/list"}"#)
        .await
        .unwrap()
        .unwrap();
    let response: Value = serde_json::from_str(&line).unwrap();

    assert_eq!(response["id"], "abc");
    assert_eq!(response["error"]["code"], -32603);
    assert_eq!(response["error"]["message"], "HTTP error 401");
}

#[tokio::test]
async fn test_unreachable_server() {
    let endpoint = closed_endpoint().await;
    let bridge = bridge(&endpoint, None);

    let err = bridge.check_health().await.unwrap_err();
    assert!(matches!(err, ServerError::Unreachable { .. }));

    let responses = relay(&bridge, "{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"tools/list\"}\n").await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 9);
    assert_eq!(responses[0]["error"]["code"], -32603);
}

#[tokio::test]
async fn test_garbage_lines_are_dropped() {
    let endpoint = start_server().await;
    let bridge = bridge(&endpoint, Some(KEY));
    let responses = relay(&bridge, "garbage\n{\"half\":\n").await;
    assert!(responses.is_empty());
}
