use portfolio_chat_proxy::build_app;
use portfolio_chat_proxy::config::ProxyConfig;
use portfolio_chat_proxy::message::ChatResponse;
use portfolio_chat_proxy::services::gemini::GeminiClient;
use portfolio_chat_proxy::services::generator::{BackendError, TextGenerator};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::ServiceExt;

const TEST_KEY: &str = "gm-test-key";

#[derive(Debug, Default, Clone)]
struct Seen {
    action: String,
    query: Option<String>,
    api_key: Option<String>,
    body: Value,
}

type SeenLog = Arc<Mutex<Vec<Seen>>>;

/// Starts a local server on an ephemeral port and returns its `/v1beta` base.
async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1beta")
}

/// Fake `generateContent` that answers with `reply` and records each request.
fn answering(reply: &'static str, log: SeenLog) -> Router {
    Router::new()
        .route(
            "/v1beta/models/{action}",
            post(
                move |State(log): State<SeenLog>,
                 Path(action): Path<String>,
                 uri: Uri,
                 headers: HeaderMap,
                 Json(body): Json<Value>| async move {
                    log.lock().unwrap().push(Seen {
                        action,
                        query: uri.query().map(str::to_string),
                        api_key: headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        body,
                    });
                    Json(json!({
                        "candidates": [{
                            "content": { "parts": [{ "text": reply }], "role": "model" },
                            "finishReason": "STOP"
                        }]
                    }))
                },
            ),
        )
        .with_state(log)
}

fn replying_with(status: StatusCode, body: &'static str) -> Router {
    Router::new().route(
        "/v1beta/models/{action}",
        post(move || async move { (status, body).into_response() }),
    )
}

fn client(base: &str, timeout: Duration) -> GeminiClient {
    GeminiClient::new(base, "gemini-pro", timeout).unwrap()
}

#[tokio::test]
async fn sends_prompt_and_returns_first_candidate() {
    let log = SeenLog::default();
    let base = spawn_backend(answering("4", log.clone())).await;

    let reply = client(&base, Duration::from_secs(5))
        .generate(TEST_KEY, "2+2?")
        .await
        .unwrap();
    assert_eq!(reply, "4");

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].action, "gemini-pro:generateContent");
    assert_eq!(seen[0].api_key.as_deref(), Some(TEST_KEY));
    // The credential travels in a header, never in the URL.
    assert!(seen[0].query.is_none());
    assert_eq!(seen[0].body, json!({ "contents": [{ "parts": [{ "text": "2+2?" }] }] }));
}

#[tokio::test]
async fn backend_error_message_is_surfaced() {
    let base = spawn_backend(replying_with(
        StatusCode::BAD_REQUEST,
        r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#,
    ))
    .await;

    let err = client(&base, Duration::from_secs(5))
        .generate(TEST_KEY, "hello")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackendError::Status {
            status: 400,
            message: "API key not valid. Please pass a valid API key.".into()
        }
    );
}

#[tokio::test]
async fn non_json_error_gets_generic_message() {
    let base = spawn_backend(replying_with(StatusCode::BAD_GATEWAY, "<html>upstream down</html>")).await;

    let err = client(&base, Duration::from_secs(5))
        .generate(TEST_KEY, "hello")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackendError::Status {
            status: 502,
            message: "Error fetching from Gemini".into()
        }
    );
}

#[tokio::test]
async fn unexpected_shape_fails_gracefully() {
    let base = spawn_backend(replying_with(StatusCode::OK, r#"{"candidates": [{"content": {}}]}"#)).await;

    let err = client(&base, Duration::from_secs(5))
        .generate(TEST_KEY, "hello")
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::MalformedResponse(_)));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let router = Router::new().route(
        "/v1beta/models/{action}",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "too late"
        }),
    );
    let base = spawn_backend(router).await;

    let err = client(&base, Duration::from_millis(200))
        .generate(TEST_KEY, "hello")
        .await
        .unwrap_err();

    assert_eq!(err, BackendError::Timeout);
}

#[tokio::test]
async fn unreachable_backend_is_transport_error_without_key() {
    // Grab a free port, then close it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/v1beta"), Duration::from_secs(5))
        .generate(TEST_KEY, "hello")
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Transport(_)));
    assert!(!err.to_string().contains(TEST_KEY));
}

#[tokio::test]
async fn full_app_relays_backend_reply() {
    let log = SeenLog::default();
    let base = spawn_backend(answering("4", log.clone())).await;

    let config = ProxyConfig {
        api_base: base,
        ..ProxyConfig::default()
    }
    .with_api_key(TEST_KEY);
    let app = build_app(config).unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"message": "2+2?"}"#))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let chat_resp: ChatResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(chat_resp.reply, "4");
    assert_eq!(log.lock().unwrap().len(), 1);
}
