//! MCP method dispatch over a fixed, registration-time set of tools.
//!
//! Tools are described once with typed parameter declarations
//! ([`ParamSpec`]), collected in a [`ToolRegistry`], and served through a
//! [`Dispatcher`] that owns all JSON-RPC envelope construction.

pub mod adapter;
pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod schema;
pub mod tool;

pub use dispatcher::{Dispatcher, Method};
pub use error::{RegistryError, ToolError};
pub use protocol::{JsonRpcRequest, JsonRpcResponse, ServerInfo};
pub use registry::ToolRegistry;
pub use tool::{handler_fn, Arguments, DeclaredType, ParamSpec, ToolDescriptor, ToolHandler, ToolOutput};
