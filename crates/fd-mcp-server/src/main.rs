use clap::Parser;
use fd_common::HelpdeskConfig;
use fd_dispatch::Dispatcher;
use fd_helpdesk::{build_registry, HelpdeskClient};
use fd_mcp_server::{bridge, http, server, server_info, AuthPolicy, Bridge};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "freshdesk-mcp",
    version,
    about = "MCP server exposing the Freshdesk helpdesk API as tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start the MCP server (stdio transport unless --http is given)
    Serve {
        /// Serve JSON-RPC over HTTP instead of stdio
        #[arg(long)]
        http: bool,

        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Timeout for each Freshdesk API request
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },

    /// Relay stdin JSON-RPC lines to a running HTTP server
    Bridge {
        #[arg(long, default_value = bridge::DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Bearer key sent with every request
        #[arg(long, env = "MCP_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // All logging goes to stderr so stdout is reserved for MCP JSON-RPC.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            http: use_http,
            host,
            port,
            timeout_secs,
        } => {
            let config = HelpdeskConfig::from_env()?.with_timeout(Duration::from_secs(timeout_secs));
            tracing::info!("Starting freshdesk-mcp for {}", config.domain);
            let client = HelpdeskClient::new(config)?;
            let registry = build_registry(&client)?;
            let dispatcher = Arc::new(Dispatcher::new(Arc::new(registry), server_info()));

            if use_http {
                let auth = AuthPolicy::from_env()?;
                tracing::info!("Authentication required: {}", auth.is_required());
                http::serve(&format!("{host}:{port}"), http::router(dispatcher, auth)).await?;
            } else {
                server::run_stdio(dispatcher).await?;
            }
        }

        Commands::Bridge {
            endpoint,
            api_key,
            timeout_secs,
        } => {
            let bridge = Bridge::new(endpoint, api_key, Duration::from_secs(timeout_secs))?;
            bridge.check_health().await?;
            bridge.run_stdio().await?;
        }
    }

    Ok(())
}
