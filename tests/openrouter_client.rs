//! OpenRouter client against a local chat-completions endpoint

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use redator::llm::{CompletionProvider, CompletionRequest, OpenRouterClient, OpenRouterConfig, ProviderError};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Seen {
    headers: Arc<Mutex<Vec<HeaderMap>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

async fn spawn(reply: fn() -> (StatusCode, Value)) -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route(
            "/chat/completions",
            post(move |State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| async move {
                seen.headers.lock().unwrap().push(headers);
                seen.bodies.lock().unwrap().push(body);
                let (status, payload) = reply();
                (status, Json(payload)).into_response()
            }),
        )
        .with_state(seen.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/chat/completions", addr), seen)
}

fn client(url: String) -> OpenRouterClient {
    let config = OpenRouterConfig {
        base_url: url,
        referer: Some("https://example.test".to_string()),
        timeout: Some(Duration::from_secs(5)),
        ..Default::default()
    };
    OpenRouterClient::with_api_key("sk-test".to_string(), config).unwrap()
}

fn request() -> CompletionRequest {
    CompletionRequest::new("google/gemini-pro")
        .with_system("Você é um formatador")
        .with_user_message("Consolide")
}

#[tokio::test]
async fn test_successful_completion() {
    let (url, seen) = spawn(|| {
        (
            StatusCode::OK,
            json!({
                "model": "google/gemini-pro",
                "choices": [{"message": {"role": "assistant", "content": "Introdução\ntexto"}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 5}
            }),
        )
    })
    .await;

    let response = client(url).complete(request()).await.unwrap();
    assert_eq!(response.content, "Introdução\ntexto");
    assert_eq!(response.usage.total(), 17);

    let headers = seen.headers.lock().unwrap()[0].clone();
    assert_eq!(headers["authorization"], "Bearer sk-test");
    assert_eq!(headers["http-referer"], "https://example.test");
    assert_eq!(headers["x-title"].as_bytes(), "Ciência Pedagogia".as_bytes());

    let body = seen.bodies.lock().unwrap()[0].clone();
    assert_eq!(body["model"], "google/gemini-pro");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "Consolide");
}

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    let (url, _) = spawn(|| (StatusCode::PAYMENT_REQUIRED, json!({"error": {"message": "no credits"}}))).await;

    let err = client(url).complete(request()).await.unwrap_err();
    match err {
        ProviderError::Api { status, message } => {
            assert_eq!(status, 402);
            assert!(message.contains("no credits"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_choices_is_invalid_response() {
    let (url, _) = spawn(|| (StatusCode::OK, json!({"choices": []}))).await;

    let err = client(url).complete(request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{}/chat/completions", addr))
        .complete(request())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Network(_)));
}
