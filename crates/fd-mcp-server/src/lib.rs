//! Transports for the Freshdesk MCP dispatcher: stdio, HTTP and the
//! stdio-to-HTTP bridge.

pub mod bridge;
pub mod error;
pub mod http;
pub mod server;
pub mod settings;

pub use bridge::Bridge;
pub use error::ServerError;
pub use settings::AuthPolicy;

use fd_dispatch::ServerInfo;

pub const SERVICE_NAME: &str = "freshdesk-mcp";

pub fn server_info() -> ServerInfo {
    ServerInfo::new(SERVICE_NAME, env!("CARGO_PKG_VERSION"))
}
