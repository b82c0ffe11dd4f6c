use crate::error::ApiError;
use fd_common::{parse_link_header, HelpdeskConfig, Pagination};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, LINK};
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// One call against the REST API. `path` is relative to the configured base
/// URL, e.g. `/tickets/42`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path, Some(body))
    }

    /// PUT without a body, used by the alert state transitions.
    pub fn put_empty(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path, None)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path, None)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body; `null` for 204 and empty bodies.
    pub body: Value,
    pub pagination: Pagination,
}

impl ApiResponse {
    pub fn is_no_content(&self) -> bool {
        self.status == StatusCode::NO_CONTENT.as_u16()
    }
}

/// Authenticated client for the Freshdesk v2 API. Cheap to clone.
#[derive(Clone)]
pub struct HelpdeskClient {
    http: reqwest::Client,
    config: Arc<HelpdeskConfig>,
}

impl HelpdeskClient {
    pub fn new(config: HelpdeskConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &HelpdeskConfig {
        &self.config
    }

    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.config.base_url, request.path);
        tracing::debug!("{} {}", request.method, request.path);

        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
            HttpMethod::Put => self.http.put(&url),
            HttpMethod::Delete => self.http.delete(&url),
        }
        .header(AUTHORIZATION, self.config.authorization_header())
        .header(CONTENT_TYPE, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let pagination = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!("{} {} returned {}", request.method, request.path, status);
            return Err(ApiError::from_status(status.as_u16(), &text));
        }

        let body = if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
            pagination,
        })
    }

    pub async fn get(&self, path: impl Into<String>) -> Result<Value, ApiError> {
        Ok(self.send(ApiRequest::get(path)).await?.body)
    }

    pub async fn post(&self, path: impl Into<String>, body: Value) -> Result<Value, ApiError> {
        Ok(self.send(ApiRequest::post(path, body)).await?.body)
    }

    pub async fn put(&self, path: impl Into<String>, body: Value) -> Result<Value, ApiError> {
        Ok(self.send(ApiRequest::put(path, body)).await?.body)
    }
}

impl fmt::Debug for HelpdeskClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelpdeskClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let req = ApiRequest::get("/tickets").query("page", 2).query("per_page", 30);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.query,
            vec![("page".to_string(), "2".to_string()), ("per_page".to_string(), "30".to_string())]
        );
        assert!(req.body.is_none());

        let req = ApiRequest::post("/tickets", json!({"subject": "x"}));
        assert_eq!(req.body, Some(json!({"subject": "x"})));

        assert!(ApiRequest::put_empty("/ams/alerts/1/resolve").body.is_none());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
