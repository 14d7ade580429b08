//! Inbound webhook payload types for the LINE platform.

use serde::Deserialize;

/// Top-level webhook body: a batch of events for one bot destination.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<InboundEvent>,
}

/// One webhook event. Only text-message events drive the router; other
/// event kinds (follow, unfollow, stickers, ...) are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(rename = "replyToken", default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<InboundMessage>,
}

impl InboundEvent {
    /// Extracts `(user_id, reply_token, text)` when this is a text-message
    /// event with a known sender; `None` otherwise.
    pub fn as_text_message(&self) -> Option<(&str, &str, &str)> {
        if self.event_type != "message" {
            return None;
        }
        let message = self.message.as_ref()?;
        if message.message_type != "text" {
            return None;
        }
        let user_id = self.source.as_ref()?.user_id.as_deref()?;
        let reply_token = self.reply_token.as_deref()?;
        Some((user_id, reply_token, message.text.as_deref()?))
    }
}

/// Sender of an event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

/// Message payload of a message event.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub text: Option<String>,
}
