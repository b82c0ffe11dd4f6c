use crate::error::ConfigError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt;
use std::time::Duration;

pub const API_KEY_VAR: &str = "FRESHDESK_API_KEY";
pub const DOMAIN_VAR: &str = "FRESHDESK_DOMAIN";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials and endpoint for the Freshdesk REST API.
#[derive(Clone)]
pub struct HelpdeskConfig {
    pub domain: String,
    api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl HelpdeskConfig {
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into().trim().trim_end_matches('/').to_string();
        let api_key = api_key.into().trim().to_string();
        if domain.is_empty() {
            return Err(ConfigError::MissingVar(DOMAIN_VAR));
        }
        if domain.contains("://") || domain.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                var: DOMAIN_VAR,
                message: format!("expected a bare host name such as acme.freshdesk.com, got '{domain}'"),
            });
        }
        if api_key.is_empty() {
            return Err(ConfigError::MissingVar(API_KEY_VAR));
        }
        let base_url = format!("https://{domain}/api/v2");
        Ok(Self {
            domain,
            api_key,
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Load credentials from `FRESHDESK_DOMAIN` and `FRESHDESK_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(API_KEY_VAR))?;
        let domain = lookup(DOMAIN_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(DOMAIN_VAR))?;

        tracing::info!("Freshdesk domain: {domain}");
        Self::new(domain, api_key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Basic auth with the API key as user name and `X` as password.
    pub fn authorization_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:X", self.api_key));
        format!("Basic {token}")
    }
}

impl fmt::Debug for HelpdeskConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelpdeskConfig")
            .field("domain", &self.domain)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
