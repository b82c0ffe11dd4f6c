use crate::error::ServerError;
use std::fmt;

pub const API_KEY_VAR: &str = "MCP_API_KEY";
pub const REQUIRE_AUTH_VAR: &str = "MCP_REQUIRE_AUTH";

/// Who may call the protected HTTP endpoints.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthPolicy {
    Open,
    /// `Authorization: Bearer <key>` must carry exactly this key.
    Bearer(String),
}

impl AuthPolicy {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Auth is on unless `MCP_REQUIRE_AUTH` is set to something other than
    /// `true`. When on, a non-empty `MCP_API_KEY` is mandatory.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerError> {
        let required = lookup(REQUIRE_AUTH_VAR)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);
        if !required {
            tracing::warn!("HTTP authentication disabled via {REQUIRE_AUTH_VAR}");
            return Ok(Self::Open);
        }

        lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(Self::Bearer)
            .ok_or(ServerError::MissingApiKey)
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Bearer(_))
    }
}

impl fmt::Debug for AuthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("Open"),
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}
