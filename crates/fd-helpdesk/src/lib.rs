//! Freshdesk REST collaborator: an authenticated HTTP client and the tool
//! set that exposes it through the dispatcher.

pub mod client;
pub mod error;
pub mod tools;
pub mod validation;

pub use client::{ApiRequest, ApiResponse, HelpdeskClient, HttpMethod};
pub use error::ApiError;
pub use tools::register_all;

use fd_dispatch::{RegistryError, ToolRegistry};

/// A registry holding every helpdesk tool, bound to `client`.
pub fn build_registry(client: &HelpdeskClient) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    register_all(&mut registry, client)?;
    Ok(registry)
}
