use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use docsum::ai::{CloudBackend, LocalBackend, Summarizer};
use docsum::core::config::{CloudBackendConfig, LocalBackendConfig};
use docsum::errors::SummarizerError;

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

impl Captured {
    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last(&self) -> (Option<String>, Value) {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

async fn start_mock_backend(
    route: &'static str,
    status: u16,
    response_body: &'static str,
) -> (String, Captured, oneshot::Sender<()>) {
    let captured = Captured::default();
    let recorder = captured.clone();

    let app = Router::new().route(
        route,
        post(move |headers: HeaderMap, Json(payload): Json<Value>| {
            let recorder = recorder.clone();
            async move {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                recorder.requests.lock().unwrap().push((auth, payload));

                let status = StatusCode::from_u16(status).unwrap();
                (
                    status,
                    [(header::CONTENT_TYPE, "application/json")],
                    response_body,
                )
                    .into_response()
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url = format!("http://{addr}{route}");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (url, captured, shutdown_tx)
}

fn local_backend(url: &str) -> LocalBackend {
    LocalBackend::new(LocalBackendConfig {
        url: url.to_string(),
        model: "llama3.2-vision".to_string(),
    })
}

fn cloud_backend(url: &str, api_key: &str) -> CloudBackend {
    CloudBackend::new(CloudBackendConfig {
        url: url.to_string(),
        model: "llama-3.3-70b-versatile".to_string(),
        api_key: api_key.to_string(),
    })
}

/// A URL on a port nothing listens on.
async fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/generate")
}

#[tokio::test]
async fn test_cloud_summary_is_message_content_exactly() {
    let body = r#"{"choices":[{"message":{"role":"assistant","content":"A fox is quick and brown."}}]}"#;
    let (url, captured, shutdown_tx) =
        start_mock_backend("/openai/v1/chat/completions", 200, body).await;

    let backend = cloud_backend(&url, "gsk_test");
    let summary = backend.summarize("The quick brown fox.").await.unwrap();

    assert_eq!(summary, "A fox is quick and brown.");
    assert_eq!(captured.count(), 1);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn test_cloud_request_has_bearer_token_and_chat_payload() {
    let body = r#"{"choices":[{"message":{"content":"ok"}}]}"#;
    let (url, captured, shutdown_tx) =
        start_mock_backend("/openai/v1/chat/completions", 200, body).await;

    let backend = cloud_backend(&url, "gsk_test");
    backend.summarize("The quick brown fox.").await.unwrap();

    let (auth, payload) = captured.last();
    assert_eq!(auth.as_deref(), Some("Bearer gsk_test"));
    let mut keys: Vec<&str> = payload.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["max_tokens", "messages", "model", "stream", "temperature", "top_p"]
    );
    assert_eq!(payload["model"], "llama-3.3-70b-versatile");
    assert_eq!(payload["stream"], false);
    assert_eq!(payload["max_tokens"], 2048);
    assert_eq!(payload["top_p"], 1.0);
    assert!((payload["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);

    let messages = payload["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], "You are an expert summarizer AI.");
    assert_eq!(messages[1]["role"], "user");
    assert!(
        messages[1]["content"]
            .as_str()
            .unwrap()
            .contains("The quick brown fox.")
    );
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn test_local_request_has_model_prompt_and_stream_only() {
    let body = r#"{"model":"llama3.2-vision","response":"Local summary.","done":true}"#;
    let (url, captured, shutdown_tx) = start_mock_backend("/api/generate", 200, body).await;

    let backend = local_backend(&url);
    let summary = backend.summarize("Some document text.").await.unwrap();

    assert_eq!(summary, "Local summary.");

    let (auth, payload) = captured.last();
    assert!(auth.is_none());
    let object = payload.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["model", "prompt", "stream"]);
    assert_eq!(payload["stream"], false);
    assert!(payload["prompt"].as_str().unwrap().contains("Some document text."));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn test_missing_summary_field_is_malformed_response() {
    let (url, _captured, shutdown_tx) =
        start_mock_backend("/api/generate", 200, r#"{"done":true}"#).await;
    let result = local_backend(&url).summarize("text").await;
    assert!(matches!(result, Err(SummarizerError::MalformedResponse(_))));
    shutdown_tx.send(()).ok();

    let (url, _captured, shutdown_tx) =
        start_mock_backend("/v1/chat/completions", 200, r#"{"choices":[]}"#).await;
    let result = cloud_backend(&url, "k").summarize("text").await;
    assert!(matches!(result, Err(SummarizerError::MalformedResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn test_non_json_body_is_malformed_response() {
    let (url, _captured, shutdown_tx) = start_mock_backend("/api/generate", 200, "hello").await;

    let result = local_backend(&url).summarize("text").await;

    assert!(matches!(result, Err(SummarizerError::MalformedResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn test_error_status_is_api_error_for_both_backends() {
    let body = r#"{"error":{"message":"Invalid API Key"}}"#;
    let (url, _captured, shutdown_tx) = start_mock_backend("/v1/chat/completions", 401, body).await;

    let result = cloud_backend(&url, "your_groq_api_key_here")
        .summarize("text")
        .await;
    match result {
        Err(SummarizerError::ApiError { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API Key"));
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
    shutdown_tx.send(()).ok();

    // The local backend checks the status too, even when the body has a `response` field.
    let (url, _captured, shutdown_tx) =
        start_mock_backend("/api/generate", 500, r#"{"response":"stale"}"#).await;
    let result = local_backend(&url).summarize("text").await;
    assert!(matches!(
        result,
        Err(SummarizerError::ApiError { status: 500, .. })
    ));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn test_connection_refused_is_http_error_and_client_stays_usable() {
    let url = dead_url().await;
    let backend = local_backend(&url);

    for _ in 0..2 {
        match backend.summarize("text").await {
            Err(SummarizerError::HttpError(detail)) => {
                assert!(detail.contains("error sending request"), "detail: {detail}");
                assert!(detail.contains("Connection refused"), "detail: {detail}");
            }
            other => panic!("expected HttpError, got {other:?}"),
        }
    }

    let (live_url, captured, shutdown_tx) =
        start_mock_backend("/api/generate", 200, r#"{"response":"back online"}"#).await;
    let summary = local_backend(&live_url).summarize("text").await.unwrap();
    assert_eq!(summary, "back online");
    assert_eq!(captured.count(), 1);
    shutdown_tx.send(()).ok();
}
