//! HTTP handlers for the webhook surface.
//!
//! Signature verification failure is the only protocol-level error (400);
//! every verified request returns 200 `OK` regardless of handler outcome,
//! so the platform never retries delivery because of internal failures.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use http::{HeaderMap, StatusCode};

use crate::adapters::line::WebhookPayload;
use crate::application::{ReplyDispatcher, Router};
use crate::domain::foundation::{ReplyToken, UserId};
use crate::ports::MessagingTransport;

/// Signature header sent by the platform with every webhook call.
const SIGNATURE_HEADER: &str = "x-line-signature";

/// Shared state for the webhook handlers.
#[derive(Clone)]
pub struct WebhookState {
    transport: Arc<dyn MessagingTransport>,
    router: Arc<Router>,
    dispatcher: ReplyDispatcher,
}

impl WebhookState {
    pub fn new(
        transport: Arc<dyn MessagingTransport>,
        router: Arc<Router>,
        dispatcher: ReplyDispatcher,
    ) -> Self {
        Self {
            transport,
            router,
            dispatcher,
        }
    }
}

/// GET /health - liveness probe
pub async fn health() -> &'static str {
    "ok"
}

/// POST /callback - signed webhook from the messaging platform
pub async fn callback(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !state.transport.verify_signature(&body, signature) {
        tracing::warn!("webhook signature verification failed");
        return (StatusCode::BAD_REQUEST, "bad signature").into_response();
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            // Verified but unparseable; acknowledge so the platform does
            // not retry.
            tracing::error!(error = %err, "failed to parse webhook body");
            return (StatusCode::OK, "OK").into_response();
        }
    };

    for event in &payload.events {
        let Some((user_id, reply_token, text)) = event.as_text_message() else {
            continue;
        };

        let (Ok(user_id), Ok(reply_token)) =
            (UserId::new(user_id), ReplyToken::new(reply_token))
        else {
            tracing::warn!("event carries empty user id or reply token, skipping");
            continue;
        };

        let messages = state.router.handle_message(&user_id, text).await;
        state
            .dispatcher
            .deliver(&reply_token, &user_id, &messages)
            .await;
    }

    (StatusCode::OK, "OK").into_response()
}
