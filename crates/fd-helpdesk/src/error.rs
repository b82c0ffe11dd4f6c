use fd_dispatch::ToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx answer from the API. `message` carries the response body, or
    /// Freshdesk's `errors` array when it sent one.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let errors = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("errors").cloned());
        let message = match errors {
            Some(errors) => format!("Validation errors: {errors}"),
            None if body.trim().is_empty() => "empty response body".to_string(),
            None => body.trim().to_string(),
        };
        Self::Status { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for ToolError {
    fn from(err: ApiError) -> Self {
        ToolError::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_surfaced() {
        let body = r#"{"description":"Validation failed","errors":[{"field":"email","message":"It should be a valid email address","code":"invalid_value"}]}"#;
        let err = ApiError::from_status(400, body);
        let rendered = err.to_string();
        assert!(rendered.starts_with("HTTP 400: Validation errors: ["));
        assert!(rendered.contains("invalid_value"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_plain_body_is_kept() {
        let err = ApiError::from_status(404, "Not Found\n");
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn test_empty_body() {
        let err = ApiError::from_status(500, "");
        assert_eq!(err.to_string(), "HTTP 500: empty response body");
    }

    #[test]
    fn test_converts_to_tool_error() {
        let tool_err: ToolError = ApiError::from_status(403, "denied").into();
        assert_eq!(tool_err.to_string(), "HTTP 403: denied");
    }
}
