//! Integration tests for the webhook endpoint.
//!
//! These tests drive the axum router end-to-end over mock ports:
//! 1. Signature verification gates the endpoint with HTTP 400
//! 2. Verified requests always return 200 `OK`, whatever happens inside
//! 3. Text-message events flow through the command router to delivery

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use gadget_concierge::adapters::http::{app_router, WebhookState};
use gadget_concierge::adapters::mock::{MockCompletionService, MockTransport};
use gadget_concierge::adapters::storage::InMemoryWishlistStore;
use gadget_concierge::application::handlers::{HandlerContext, WishlistCommands};
use gadget_concierge::application::{ReplyDispatcher, Router, SessionStore};
use gadget_concierge::config::{AiConfig, ConversationConfig};
use gadget_concierge::ports::MessagingTransport;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    app: axum::Router,
    transport: MockTransport,
    completion: MockCompletionService,
}

fn test_app() -> TestApp {
    test_app_with(MockCompletionService::new())
}

fn test_app_with(completion: MockCompletionService) -> TestApp {
    let transport = MockTransport::new();
    let transport_arc: Arc<dyn MessagingTransport> = Arc::new(transport.clone());

    let ai = test_ai_config();
    let conversation = ConversationConfig::default();

    let handlers = HandlerContext::new(Arc::new(completion.clone()), &ai, &conversation);
    let wishlist = WishlistCommands::new(Arc::new(InMemoryWishlistStore::new()));
    let router = Arc::new(Router::new(
        SessionStore::new(),
        handlers,
        wishlist,
        &conversation,
    ));
    let dispatcher = ReplyDispatcher::new(transport_arc.clone());

    let state = WebhookState::new(transport_arc, router, dispatcher);
    TestApp {
        app: app_router(state),
        transport,
        completion,
    }
}

fn test_ai_config() -> AiConfig {
    // Deserialization applies the same defaults the env loader would.
    serde_json::from_value(json!({"openai_api_key": "sk-test"})).unwrap()
}

fn text_event_body(user_id: &str, reply_token: &str, text: &str) -> String {
    json!({
        "destination": "U-bot",
        "events": [{
            "type": "message",
            "replyToken": reply_token,
            "source": {"type": "user", "userId": user_id},
            "message": {"type": "text", "text": text}
        }]
    })
    .to_string()
}

fn signed_request(body: String) -> Request<Body> {
    // MockTransport accepts the fixed marker as a valid signature.
    Request::post("/callback")
        .header("x-line-signature", "valid")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn bad_signature_is_rejected_with_400() {
    let t = test_app();

    let request = Request::post("/callback")
        .header("x-line-signature", "forged")
        .body(Body::from(text_event_body("U-1", "r-1", "說明")))
        .unwrap();

    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(t.transport.deliveries().is_empty());
}

#[tokio::test]
async fn missing_signature_is_rejected_with_400() {
    let t = test_app();

    let request = Request::post("/callback")
        .body(Body::from(text_event_body("U-1", "r-1", "說明")))
        .unwrap();

    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verified_request_returns_200_ok() {
    let t = test_app();

    let response = t
        .app
        .oneshot(signed_request(text_event_body("U-1", "r-1", "說明")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");

    let texts = t.transport.delivered_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("3C小助手"));
}

#[tokio::test]
async fn unparseable_body_is_acknowledged_not_retried() {
    let t = test_app();

    let response = t
        .app
        .oneshot(signed_request("this is not json".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn non_text_events_are_skipped() {
    let t = test_app();

    let body = json!({
        "events": [{
            "type": "follow",
            "replyToken": "r-1",
            "source": {"type": "user", "userId": "U-1"}
        }]
    })
    .to_string();

    let response = t.app.oneshot(signed_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(t.transport.deliveries().is_empty());
    assert_eq!(t.completion.call_count(), 0);
}

#[tokio::test]
async fn spec_query_flow_spans_two_webhook_calls() {
    let t = test_app_with(MockCompletionService::new().with_response("A17 Pro、6.1吋"));

    let response = t
        .app
        .clone()
        .oneshot(signed_request(text_event_body("U-1", "r-1", "查詢裝置")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = t
        .app
        .oneshot(signed_request(text_event_body("U-1", "r-2", "iPhone 15")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let texts = t.transport.delivered_texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("請輸入您想查詢的裝置型號"));
    assert_eq!(texts[1], "A17 Pro、6.1吋");
    assert_eq!(t.completion.call_count(), 1);
}

#[tokio::test]
async fn completion_failure_still_returns_200_with_chat_error() {
    use gadget_concierge::adapters::mock::MockCompletionError;

    let t = test_app_with(MockCompletionService::new().with_error(
        MockCompletionError::Timeout { timeout_secs: 60 },
    ));

    t.app
        .clone()
        .oneshot(signed_request(text_event_body("U-1", "r-1", "查詢裝置")))
        .await
        .unwrap();
    let response = t
        .app
        .oneshot(signed_request(text_event_body("U-1", "r-2", "iPhone 15")))
        .await
        .unwrap();

    // The failure reaches the user as chat text, never as HTTP status.
    assert_eq!(response.status(), StatusCode::OK);
    let texts = t.transport.delivered_texts();
    assert!(texts[1].starts_with("查詢時發生錯誤："));
}

#[tokio::test]
async fn expired_reply_token_falls_back_to_push() {
    let t = test_app();
    t.transport.expire_reply_tokens();

    let response = t
        .app
        .oneshot(signed_request(text_event_body("U-1", "r-1", "說明")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(t.transport.push_count(), 1);
}

#[tokio::test]
async fn health_endpoint_responds() {
    let t = test_app();

    let response = t
        .app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn multiple_events_in_one_call_are_all_processed() {
    let t = test_app();

    let body = json!({
        "events": [
            {
                "type": "message",
                "replyToken": "r-1",
                "source": {"type": "user", "userId": "U-1"},
                "message": {"type": "text", "text": "說明"}
            },
            {
                "type": "message",
                "replyToken": "r-2",
                "source": {"type": "user", "userId": "U-2"},
                "message": {"type": "text", "text": "不存在的指令"}
            }
        ]
    })
    .to_string();

    let response = t.app.oneshot(signed_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(t.transport.delivered_texts().len(), 2);
}

#[tokio::test]
async fn concurrent_users_keep_separate_flows() {
    let t = test_app_with(
        MockCompletionService::new()
            .with_response("for alice")
            .with_response("for bob"),
    );

    // Interleaved turns from two users.
    for (user, token, text) in [
        ("U-alice", "r-1", "查詢裝置"),
        ("U-bob", "r-2", "評價大師"),
        ("U-alice", "r-3", "iPhone 15"),
        ("U-bob", "r-4", "Pixel 9"),
    ] {
        let response = t
            .app
            .clone()
            .oneshot(signed_request(text_event_body(user, token, text)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let calls = t.completion.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].user_prompt.contains("iPhone 15"));
    assert!(calls[1].user_prompt.contains("Pixel 9"));
}
