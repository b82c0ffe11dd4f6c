use crate::error::ServerError;
use fd_dispatch::{Dispatcher, JsonRpcResponse};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// Run the MCP server: read JSON-RPC from stdin, write responses to stdout.
pub async fn run_stdio(dispatcher: Arc<Dispatcher>) -> Result<(), ServerError> {
    tracing::info!(
        "MCP server ready with {} tools, reading from stdin",
        dispatcher.registry().len()
    );
    let reader = BufReader::new(tokio::io::stdin());
    serve_lines(dispatcher, reader, tokio::io::stdout()).await?;
    tracing::info!("stdin closed, shutting down");
    Ok(())
}

/// Dispatch every non-blank line of `reader` on its own task, as raw bytes.
/// Responses are written one per line by a single writer task, in
/// completion order.
/// Returns the writer once input is exhausted and every response is flushed.
pub async fn serve_lines<R, W>(
    dispatcher: Arc<Dispatcher>,
    mut reader: R,
    writer: W,
) -> Result<W, ServerError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
    let writer_task = tokio::spawn(write_responses(rx, writer));

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        // Undecoded: invalid UTF-8 gets an error reply like any bad frame.
        let frame = buf.trim_ascii().to_vec();
        if frame.is_empty() {
            continue;
        }

        let dispatcher = Arc::clone(&dispatcher);
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(response) = dispatcher.dispatch_slice(&frame).await {
                // Receiver only goes away if the writer already failed.
                let _ = tx.send(response);
            }
        });
    }

    // In-flight tasks hold clones; the writer ends when the last one drops.
    drop(tx);
    writer_task.await?
}

async fn write_responses<W>(
    mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>,
    mut writer: W,
) -> Result<W, ServerError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let json = serde_json::to_string(&response)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fd_dispatch::{
        handler_fn, Arguments, DeclaredType, ParamSpec, ServerInfo, ToolDescriptor, ToolError,
        ToolOutput, ToolRegistry,
    };
    use serde_json::Value;

    fn dispatcher() -> Arc<Dispatcher> {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDescriptor::new(
                    "echo",
                    handler_fn(|args: Arguments| async move {
                        Ok::<_, ToolError>(ToolOutput::Text(args.str("message")?.to_string()))
                    }),
                )
                .with_description("Echo a message back")
                .with_param(ParamSpec::required("message", DeclaredType::Str)),
            )
            .unwrap();
        Arc::new(Dispatcher::new(
            Arc::new(registry),
            ServerInfo::new("freshdesk-mcp", "test"),
        ))
    }

    async fn run(input: &str) -> Vec<Value> {
        run_bytes(input.as_bytes()).await
    }

    async fn run_bytes(input: &[u8]) -> Vec<Value> {
        let out = serve_lines(dispatcher(), input, Vec::new())
            .await
            .unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_line_per_response() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n\n   \n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"echo","arguments":{"message":"hi"}}}"#,
            "\n",
        );
        let mut responses = run(input).await;
        responses.sort_by_key(|r| r["id"].as_i64());

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(responses[1]["result"]["content"][0]["text"], "hi");
    }

    #[tokio::test]
    async fn test_garbage_line_gets_error() {
        let responses = run("not json\n").await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["error"]["code"], -32603);
        assert_eq!(responses[0]["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_serving() {
        let input = b"\xff\xfe\n{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n";
        let mut responses = run_bytes(input).await;
        responses.sort_by_key(|r| r["id"].as_i64());

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[0]["error"]["code"], -32603);
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"]["tools"][0]["name"], "echo");
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let responses = run(r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#).await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 3);
    }

    #[tokio::test]
    async fn test_empty_input() {
        assert!(run("").await.is_empty());
    }
}
