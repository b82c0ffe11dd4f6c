//! Streamable HTTP transport: one JSON-RPC message per `POST /mcp`.

use crate::error::ServerError;
use crate::settings::AuthPolicy;
use crate::SERVICE_NAME;
use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use fd_dispatch::Dispatcher;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub auth: Arc<AuthPolicy>,
}

pub fn router(dispatcher: Arc<Dispatcher>, auth: AuthPolicy) -> Router {
    let state = AppState {
        dispatcher,
        auth: Arc::new(auth),
    };

    let protected = Router::new()
        .route("/mcp", post(handle_mcp))
        .route("/debug/tools", get(debug_tools))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
}

pub async fn serve(addr: &str, router: Router) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP MCP server listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}

async fn handle_mcp(State(state): State<AppState>, body: Bytes) -> Response {
    match state.dispatcher.dispatch_slice(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": SERVICE_NAME }))
}

async fn debug_tools(State(state): State<AppState>) -> Json<Value> {
    let names = state.dispatcher.registry().names();
    Json(json!({ "count": names.len(), "tools": names }))
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    let required = state.auth.is_required();
    Json(json!({
        "service": "Freshdesk MCP Server",
        "version": state.dispatcher.server_info().version,
        "authentication": {
            "authentication_required": required,
            "auth_method": if required { "Bearer token" } else { "None" },
        },
        "endpoints": {
            "mcp": "/mcp",
            "health": "/health",
            "debug": "/debug/tools",
        },
    }))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = raw.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn unauthorized(detail: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": detail }))).into_response()
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let AuthPolicy::Bearer(expected) = state.auth.as_ref() else {
        return next.run(request).await;
    };

    let verdict = match bearer_token(request.headers()) {
        None => Err("Authorization header required"),
        Some(token) if token != expected.as_str() => {
            let prefix: String = token.chars().take(8).collect();
            tracing::warn!("Invalid API key attempted: {prefix}...");
            Err("Invalid API key")
        }
        Some(_) => Ok(()),
    };

    match verdict {
        Ok(()) => next.run(request).await,
        Err(detail) => unauthorized(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use fd_dispatch::{ServerInfo, ToolRegistry};
    use tower::ServiceExt;

    fn app(auth: AuthPolicy) -> Router {
        let dispatcher = Dispatcher::new(
            Arc::new(ToolRegistry::new()),
            ServerInfo::new(SERVICE_NAME, "1.2.0"),
        );
        router(Arc::new(dispatcher), auth)
    }

    fn bearer() -> AuthPolicy {
        AuthPolicy::Bearer("letmein".into())
    }

    fn post_mcp(body: &str, token: Option<&str>) -> Request<Body> {
        post_mcp_bytes(body.as_bytes().to_vec(), token)
    }

    fn post_mcp_bytes(body: Vec<u8>, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/mcp");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_needs_no_auth() {
        let response = app(bearer())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"status": "healthy", "service": "freshdesk-mcp"})
        );
    }

    #[tokio::test]
    async fn test_root_reports_auth() {
        let response = app(AuthPolicy::Open)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["service"], "Freshdesk MCP Server");
        assert_eq!(body["version"], "1.2.0");
        assert_eq!(body["authentication"]["authentication_required"], false);
        assert_eq!(body["authentication"]["auth_method"], "None");
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let request = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let response = app(bearer()).oneshot(post_mcp(request, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["detail"], "Authorization header required");
    }

    #[tokio::test]
    async fn test_wrong_key_rejected() {
        let request = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let response = app(bearer())
            .oneshot(post_mcp(request, Some("nope")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["detail"], "Invalid API key");
    }

    #[tokio::test]
    async fn test_mcp_request_with_key() {
        let request = r#"{"jsonrpc":"2.0","id":7,"method":"initialize","params":{}}"#;
        let response = app(bearer())
            .oneshot(post_mcp(request, Some("letmein")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], 7);
        assert_eq!(body["result"]["serverInfo"]["name"], "freshdesk-mcp");
    }

    #[tokio::test]
    async fn test_notification_is_no_content() {
        let request = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        let response = app(AuthPolicy::Open)
            .oneshot(post_mcp(request, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_body_gets_rpc_error() {
        let response = app(AuthPolicy::Open)
            .oneshot(post_mcp_bytes(vec![0xff, 0xfe], None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32603);
        assert_eq!(body["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_debug_tools_behind_auth() {
        let request = Request::get("/debug/tools")
            .header(header::AUTHORIZATION, "Bearer letmein")
            .body(Body::empty())
            .unwrap();
        let response = app(bearer()).oneshot(request).await.unwrap();
        assert_eq!(json_body(response).await, json!({"tools": [], "count": 0}));

        let response = app(bearer())
            .oneshot(Request::get("/debug/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc"));
        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
