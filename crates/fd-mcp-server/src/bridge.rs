//! stdio client that relays line-delimited JSON-RPC to a running HTTP server.

use crate::error::ServerError;
use fd_dispatch::protocol::INTERNAL_ERROR;
use fd_dispatch::JsonRpcResponse;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/mcp";
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Bridge {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl Bridge {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `<base>/health` for an endpoint of the form `<base>/mcp`.
    pub fn health_url(&self) -> String {
        let trimmed = self.endpoint.trim_end_matches('/');
        let base = trimmed.strip_suffix("/mcp").unwrap_or(trimmed);
        format!("{base}/health")
    }

    /// Any HTTP answer counts as alive; only a failed connection is fatal.
    pub async fn check_health(&self) -> Result<(), ServerError> {
        let url = self.health_url();
        let response = self
            .http
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|source| ServerError::Unreachable {
                url: url.clone(),
                source,
            })?;
        tracing::info!("Health check {url}: {}", response.status());
        Ok(())
    }

    /// Forward one stdin line. Returns the line to print, if any.
    pub async fn relay_line(&self, line: &str) -> Result<Option<String>, ServerError> {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!("Dropping unparseable line: {e}");
                return Ok(None);
            }
        };
        let id = message.get("id").filter(|id| !id.is_null()).cloned();
        let method = message.get("method").and_then(Value::as_str).unwrap_or("");
        tracing::info!("Relaying {method} (id {id:?})");

        let reply = match self.forward(&message).await {
            Ok(None) => {
                tracing::debug!("No response needed for {method}");
                return Ok(None);
            }
            Ok(Some(body)) => return Ok(Some(body)),
            Err(failure) => {
                tracing::error!("{failure}");
                JsonRpcResponse::error(id, INTERNAL_ERROR, failure)
            }
        };
        Ok(Some(serde_json::to_string(&reply)?))
    }

    /// POST the message. `Ok(None)` for 204, the compacted body for 200,
    /// otherwise the failure text to report back.
    async fn forward(&self, message: &Value) -> Result<Option<String>, String> {
        let mut request = self.http.post(&self.endpoint).json(message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(None),
            StatusCode::OK => {
                let body: Value = response.json().await.map_err(|e| e.to_string())?;
                Ok(Some(body.to_string()))
            }
            status => Err(format!("HTTP error {}", status.as_u16())),
        }
    }

    /// Relay `reader` line by line, strictly in order.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<W, ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(out) = self.relay_line(line).await? {
                writer.write_all(out.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        Ok(writer)
    }

    pub async fn run_stdio(&self) -> Result<(), ServerError> {
        tracing::info!("Bridge ready, relaying stdin to {}", self.endpoint);
        self.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        Ok(())
    }
}
