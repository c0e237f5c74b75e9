//! Axum-based HTTP surface for the responder.
//!
//! - `GET /` describes the service.
//! - `POST /chat` answers one message with `{reply, source}`.
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use lightai_core::config::is_truthy;
use lightai_core::responder::Responder;
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{debug, error, info, instrument, warn};

/// Maximum request body size (64KB).
pub const MAX_BODY_SIZE: usize = 65_536;
/// Upper bound for one request, including a remote provider round trip.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

const MISSING_MESSAGE: &str = "missing `message` in JSON body";
const USE_REMOTE_HEADER: &str = "x-use-openai";

#[derive(Clone)]
pub struct AppState {
    pub responder: Arc<Responder>,
}

/// Both spellings of each field may appear in the same body.
#[derive(Debug, Default, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    /// Accepts `true`, a non-zero number, or a truthy string.
    #[serde(default)]
    pub use_openai: Option<Value>,
    #[serde(default, rename = "useOpenAI")]
    pub use_openai_camel: Option<Value>,
}

impl ChatBody {
    /// The first non-empty of `message` and `msg`.
    fn message(self) -> Option<String> {
        self.message
            .filter(|m| !m.is_empty())
            .or(self.msg.filter(|m| !m.is_empty()))
    }

    fn requests_remote(&self) -> bool {
        [&self.use_openai, &self.use_openai_camel]
            .into_iter()
            .flatten()
            .any(flag_is_set)
    }
}

/// Builds the application router.
pub fn router(responder: Arc<Responder>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/chat", post(handle_chat))
        .with_state(AppState { responder })
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// Serves HTTP on all interfaces until Ctrl-C.
#[instrument(skip(responder))]
pub async fn serve(port: u16, responder: Arc<Responder>) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("LightAI listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(responder))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

/// GET /: service descriptor
async fn handle_index(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "LightAI",
        "version": env!("CARGO_PKG_VERSION"),
        "openai_configured": state.responder.remote_available(),
        "usage": {
            "chat": "POST /chat {\"message\": \"...\"}",
            "remote": "set use_openai: true or header x-use-openai: 1",
        },
    }))
}

/// POST /chat: reply to a single message
async fn handle_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(e) => {
            debug!("Chat body rejected: {e}");
            ChatBody::default()
        }
    };

    let use_remote = body.requests_remote() || header_requests_remote(&headers);
    let Some(message) = body.message() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": MISSING_MESSAGE })),
        )
            .into_response();
    };

    let responder = state.responder.clone();
    let task = tokio::spawn(async move { responder.get_reply(&message, use_remote).await });

    match task.await {
        Ok(reply) => {
            info!(source = %reply.source, use_remote, "Chat reply");
            (StatusCode::OK, Json(reply)).into_response()
        }
        Err(e) => {
            error!("Reply task failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

fn flag_is_set(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => is_truthy(s),
        _ => false,
    }
}

fn header_requests_remote(headers: &HeaderMap) -> bool {
    headers
        .get(USE_REMOTE_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{HeaderValue, Request};
    use http_body_util::BodyExt;
    use lightai_core::{ProviderError, RemoteProvider};
    use tower::ServiceExt;

    struct FixedProvider(Result<&'static str, &'static str>);

    #[async_trait]
    impl RemoteProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _message: &str) -> Result<String, ProviderError> {
            self.0
                .map(str::to_string)
                .map_err(|message| ProviderError::Api {
                    status: 503,
                    message: message.to_string(),
                })
        }
    }

    fn local_only() -> Router {
        router(Arc::new(Responder::new(None, false)))
    }

    fn with_remote(result: Result<&'static str, &'static str>) -> Router {
        router(Arc::new(Responder::new(
            Some(Arc::new(FixedProvider(result))),
            false,
        )))
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let payload = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&payload).unwrap())
    }

    #[tokio::test]
    async fn chat_hello_without_provider_replies_locally() {
        let (status, body) = send(local_only(), chat_request(r#"{"message":"hello"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"reply": "Hello — I am LightAI, your local assistant.", "source": "local"})
        );
    }

    #[tokio::test]
    async fn chat_accepts_msg_alias() {
        let (status, body) = send(local_only(), chat_request(r#"{"msg":"tell me a joke"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "local");
        assert_eq!(body["reply"], lightai_core::local::JOKE_REPLY);
    }

    #[tokio::test]
    async fn chat_without_message_is_bad_request() {
        for payload in [r#"{}"#, r#"{"message":""}"#, r#"{"use_openai":true}"#, "not json"] {
            let (status, body) = send(local_only(), chat_request(payload)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {payload}");
            assert_eq!(body, json!({"error": "missing `message` in JSON body"}));
        }
    }

    #[tokio::test]
    async fn chat_without_content_type_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(local_only(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MISSING_MESSAGE);
    }

    #[tokio::test]
    async fn chat_accepts_both_spellings_in_one_body() {
        let (status, body) = send(
            local_only(),
            chat_request(r#"{"message":"hello","msg":"hello"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "Hello — I am LightAI, your local assistant.");

        let (status, body) = send(
            local_only(),
            chat_request(r#"{"message":"","msg":"tell me a joke"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], lightai_core::local::JOKE_REPLY);

        let (status, body) = send(
            with_remote(Ok("unused")),
            chat_request(r#"{"message":"hello","use_openai":false,"useOpenAI":false}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "local");

        let (_, body) = send(
            with_remote(Ok("camel wins")),
            chat_request(r#"{"message":"hello","use_openai":false,"useOpenAI":true}"#),
        )
        .await;
        assert_eq!(body, json!({"reply": "camel wins", "source": "remote"}));
    }

    #[tokio::test]
    async fn chat_body_flag_routes_to_remote() {
        for payload in [
            r#"{"message":"hi","use_openai":true}"#,
            r#"{"message":"hi","useOpenAI":1}"#,
            r#"{"message":"hi","use_openai":"yes"}"#,
        ] {
            let (status, body) = send(with_remote(Ok("remote says hi")), chat_request(payload)).await;

            assert_eq!(status, StatusCode::OK, "payload: {payload}");
            assert_eq!(body, json!({"reply": "remote says hi", "source": "remote"}));
        }
    }

    #[tokio::test]
    async fn chat_header_routes_to_remote() {
        let mut request = chat_request(r#"{"message":"hi"}"#);
        request
            .headers_mut()
            .insert("x-use-openai", HeaderValue::from_static("TRUE"));

        let (_, body) = send(with_remote(Ok("from header")), request).await;

        assert_eq!(body["source"], "remote");
        assert_eq!(body["reply"], "from header");
    }

    #[tokio::test]
    async fn chat_stays_local_without_override_when_remote_disabled() {
        let (_, body) = send(
            with_remote(Ok("unused")),
            chat_request(r#"{"message":"hi","use_openai":false}"#),
        )
        .await;

        assert_eq!(body["source"], "local");
    }

    #[tokio::test]
    async fn chat_remote_failure_falls_back_to_local() {
        let (status, body) = send(
            with_remote(Err("provider down")),
            chat_request(r#"{"message":"hello","use_openai":true}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "local");
        assert_eq!(body["reply"], "Hello — I am LightAI, your local assistant.");
    }

    #[tokio::test]
    async fn index_describes_service() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let (status, body) = send(with_remote(Ok("unused")), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "LightAI");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["openai_configured"], true);
        assert!(body["usage"]["chat"].as_str().unwrap().contains("/chat"));

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (_, body) = send(local_only(), request).await;
        assert_eq!(body["openai_configured"], false);
    }

    #[test]
    fn test_flag_is_set() {
        assert!(flag_is_set(&json!(true)));
        assert!(flag_is_set(&json!(1)));
        assert!(flag_is_set(&json!("true")));
        assert!(!flag_is_set(&json!(false)));
        assert!(!flag_is_set(&json!(0)));
        assert!(!flag_is_set(&json!("no")));
        assert!(!flag_is_set(&json!(null)));
    }
}
