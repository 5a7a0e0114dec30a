//! Integration tests for the Gemini provider
//!
//! Each test mocks the `generateContent` endpoint with mockito.

use carechat::ai::providers::GeminiProvider;
use carechat::ai::{RemoteCapability, RemoteError, RemoteRequest};
use carechat::config::AssistantConfig;
use carechat::resolver::{Resolver, unavailable_reply};
use carechat::types::ChatMessage;
use mockito::{Matcher, Mock, ServerGuard};
use std::sync::Arc;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

async fn mock_generate(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("POST", GENERATE_PATH)
        .match_header("x-goog-api-key", "test-key")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

fn provider(server: &ServerGuard) -> GeminiProvider {
    GeminiProvider::new(&AssistantConfig {
        api_key: Some("test-key".to_string()),
        base_url: format!("{}/v1beta", server.url()),
        ..AssistantConfig::default()
    })
    .unwrap()
}

fn request() -> RemoteRequest {
    RemoteRequest::from_conversation(&[ChatMessage::user("xyzzy")], None)
}

#[tokio::test]
async fn successful_call_returns_payload_and_sends_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJsonString(
            r#"{"contents":[{"role":"user","parts":[{"text":"xyzzy"}]}],"generationConfig":{"maxOutputTokens":1024}}"#
                .to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Sure, how can I help?"}]}}]}"#)
        .create_async()
        .await;

    let reply = provider(&server).complete(&request()).await.unwrap();
    assert_eq!(reply.text().as_deref(), Some("Sure, how can I help?"));
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_status_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_generate(&mut server, 503, r#"{"error":"busy"}"#).await;

    let err = provider(&server).complete(&request()).await.unwrap_err();
    match err {
        RemoteError::Status { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert!(body.contains("busy"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn non_json_body_is_malformed_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_generate(&mut server, 200, "<html>oops</html>").await;

    let err = provider(&server).complete(&request()).await.unwrap_err();
    assert!(matches!(err, RemoteError::Malformed(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn resolver_hides_http_errors_from_the_user() {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_generate(&mut server, 500, r#"{"error":"stack trace here"}"#).await;

    let remote: Arc<dyn RemoteCapability> = Arc::new(provider(&server));
    let reply = Resolver::new(remote)
        .resolve(&[ChatMessage::user("xyzzy")], None)
        .await;
    assert_eq!(reply.text, unavailable_reply());
    assert!(!reply.text.contains("stack trace"));
    mock.assert_async().await;
}
