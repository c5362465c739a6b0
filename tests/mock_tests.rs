//! Mock-based tests for the gateway's provider interactions.
//!
//! These tests use wiremock to simulate provider responses and drive the
//! full router with tower's oneshot, without real network access.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chatgpt_gateway::{
    api::{build_router, AppState},
    core::config::{GatewayConfig, PoolConfig, ServerConfig},
    services::{ChatService, CredentialPool},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn test_config(api_base: String, max_continuations: u32) -> GatewayConfig {
    GatewayConfig {
        api_keys: "sk-test".to_string(),
        proxy_url: None,
        api_base,
        server: ServerConfig::default(),
        pool: PoolConfig::default(),
        max_continuations,
    }
}

fn test_app(mock_server: &MockServer, max_continuations: u32) -> Router {
    let config = test_config(mock_server.uri(), max_continuations);
    let pool = Arc::new(CredentialPool::from_config(&config).unwrap());
    let chat_service = ChatService::from_config(&config, pool);
    build_router(Arc::new(AppState {
        config,
        chat_service,
    }))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn chat_response(content: &str, finish_reason: &str, total_tokens: u32) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": finish_reason
        }],
        "usage": {
            "prompt_tokens": 10,
            "completion_tokens": total_tokens - 10,
            "total_tokens": total_tokens
        }
    })
}

#[tokio::test]
async fn test_successful_chat_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("Hello!", "stop", 19)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server, 5);
    let (status, body) = post_json(
        app,
        "/chatGPT/sendMsg",
        json!({
            "user_id": 1,
            "messages": [{"role": "user", "content": "Hi"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["error"], false);
    assert_eq!(
        body["data"]["choices"][0]["message"]["content"],
        "Hello!"
    );
    assert_eq!(body["data"]["usage"]["total_tokens"], 19);
    assert!(!body["trace_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_truncated_issues_exactly_one_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("done", "stop", 15)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server, 5);
    let (_, body) = post_json(
        app,
        "/chatGPT/sendMsg",
        json!({"messages": [{"role": "user", "content": "Hi"}]}),
    )
    .await;

    assert_eq!(body["code"], 0);
    // mock_server verifies the expect(1) call count on drop
}

#[tokio::test]
async fn test_continuation_accumulates_content_and_replaces_usage() {
    let mock_server = MockServer::start().await;

    // First call: truncated at the length limit with partial content "A".
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("A", "length", 100)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    // Second call: natural completion with content "B".
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("B", "stop", 42)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server, 5);
    let (_, body) = post_json(
        app,
        "/chatGPT/sendMsg",
        json!({"messages": [{"role": "user", "content": "tell me a story"}]}),
    )
    .await;

    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["choices"][0]["message"]["content"], "AB");
    assert_eq!(body["data"]["choices"][0]["finish_reason"], "stop");
    // usage comes from the most recent call, not a sum
    assert_eq!(body["data"]["usage"]["total_tokens"], 42);
}

#[tokio::test]
async fn test_continuation_limit_is_enforced() {
    let mock_server = MockServer::start().await;

    // Provider keeps claiming truncation forever.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_response("again", "length", 100)),
        )
        .expect(3) // initial call + 2 continuations
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server, 2);
    let (status, body) = post_json(
        app,
        "/chatGPT/sendMsg",
        json!({"messages": [{"role": "user", "content": "Hi"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 500);
    assert_eq!(body["error"], true);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("continuation calls"));
}

#[tokio::test]
async fn test_provider_error_message_passes_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"message": "You exceeded your current quota"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server, 5);
    let (status, body) = post_json(
        app,
        "/chatGPT/sendMsg",
        json!({"messages": [{"role": "user", "content": "Hi"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 500);
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "You exceeded your current quota");
}

#[tokio::test]
async fn test_malformed_provider_body_is_a_generic_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>bad gateway</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server, 5);
    let (_, body) = post_json(
        app,
        "/chatGPT/sendMsg",
        json!({"messages": [{"role": "user", "content": "Hi"}]}),
    )
    .await;

    assert_eq!(body["code"], 500);
    assert_eq!(body["message"], "server error, please retry later");
}

#[tokio::test]
async fn test_empty_message_never_reaches_the_provider() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server, 5);
    let (status, body) = post_json(
        app.clone(),
        "/chatGPT/sendMsg",
        json!({"messages": [{"role": "user", "content": "   "}]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 1007);

    let (_, body) = post_json(app, "/chat/sendMsg", json!({"msg": "  \t  "})).await;
    assert_eq!(body["code"], 1007);
}

#[tokio::test]
async fn test_empty_choices_returned_as_is() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-empty",
            "choices": [],
            "usage": {"prompt_tokens": 5, "completion_tokens": 0, "total_tokens": 5}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server, 5);
    let (_, body) = post_json(
        app,
        "/chatGPT/sendMsg",
        json!({"messages": [{"role": "user", "content": "Hi"}]}),
    )
    .await;

    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["choices"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_legacy_completion_flow() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"text": " I am fine.", "finish_reason": "stop"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server, 5);
    let (status, body) = post_json(
        app,
        "/chat/sendMsg",
        json!({
            "user_id": 3,
            "msg": "how are you",
            "prompt": "context",
            "role_asker": " Alice ",
            "role_ai": "Bot"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["message"], " I am fine.");
    assert_eq!(
        body["data"]["prompt"],
        "context\nAlice: Byehow are you\nBot: Bye I am fine."
    );
    assert_eq!(body["data"]["role_asker"], "Alice");
    assert_eq!(body["data"]["role_ai"], "Bot");
}

#[tokio::test]
async fn test_malformed_inbound_json_is_params_invalid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server, 5);
    let (status, body) = post_raw(app, "/chatGPT/sendMsg", "{not json".to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 1007);
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "invalid parameters");
    assert!(!body["trace_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_health_endpoint() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server, 5);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["credentials"], 1);
}

#[tokio::test]
async fn test_continuation_appends_partial_answer_to_conversation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_response("part one", "length", 50)),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(wiremock::matchers::body_string_contains("part one"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_response(" part two", "stop", 60)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server, 5);
    let (_, body) = post_json(
        app,
        "/chatGPT/sendMsg",
        json!({"messages": [{"role": "user", "content": "go"}]}),
    )
    .await;

    // The second mock only matches when the partial answer was appended to
    // the outbound conversation; expect(1) proves it was hit.
    assert_eq!(body["code"], 0);
    assert_eq!(
        body["data"]["choices"][0]["message"]["content"],
        "part one part two"
    );
}
