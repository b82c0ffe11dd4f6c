use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("MCP_REQUIRE_AUTH is enabled but MCP_API_KEY is not set")]
    MissingApiKey,

    #[error("Cannot connect to MCP server at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Task(#[from] tokio::task::JoinError),
}
