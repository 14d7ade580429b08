//! Messaging Transport Port - Interface to the LINE-style messaging API.
//!
//! Covers the three operations the core needs: webhook signature
//! verification, token-scoped reply, and user-scoped push. Reply tokens are
//! single-use and short-lived; the expired/invalid case is a distinguished
//! error variant so the dispatcher can fall back to push delivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ReplyToken, UserId};

/// Port for outbound messaging and webhook verification.
#[async_trait]
pub trait MessagingTransport: Send + Sync {
    /// Verifies a webhook body against its signature header.
    fn verify_signature(&self, body: &[u8], signature: &str) -> bool;

    /// Sends messages in reply to a specific inbound message.
    async fn reply(
        &self,
        token: &ReplyToken,
        messages: &[OutgoingMessage],
    ) -> Result<(), TransportError>;

    /// Sends messages addressed directly to a user.
    async fn push(
        &self,
        user_id: &UserId,
        messages: &[OutgoingMessage],
    ) -> Result<(), TransportError>;
}

/// Outbound text message, optionally carrying quick-reply choices.
///
/// Serializes to the platform's message payload shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    #[serde(rename = "type")]
    message_type: String,
    text: String,
    #[serde(
        rename = "quickReply",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    quick_reply: Option<QuickReply>,
}

impl OutgoingMessage {
    /// Creates a plain text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            message_type: "text".to_string(),
            text: text.into(),
            quick_reply: None,
        }
    }

    /// Creates a text message with quick-reply choices.
    pub fn with_quick_replies(text: impl Into<String>, items: Vec<QuickReplyItem>) -> Self {
        Self {
            message_type: "text".to_string(),
            text: text.into(),
            quick_reply: Some(QuickReply { items }),
        }
    }

    /// The visible text of the message.
    pub fn text_content(&self) -> &str {
        &self.text
    }

    /// The quick-reply choices, if any.
    pub fn quick_replies(&self) -> Option<&[QuickReplyItem]> {
        self.quick_reply.as_ref().map(|qr| qr.items.as_slice())
    }
}

/// Quick-reply container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub items: Vec<QuickReplyItem>,
}

/// One tappable quick-reply choice that sends `text` back as a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReplyItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub action: MessageAction,
}

impl QuickReplyItem {
    /// A message-action choice: tapping sends `text`, labeled `label`.
    pub fn message(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            item_type: "action".to_string(),
            action: MessageAction {
                action_type: "message".to_string(),
                label: label.into(),
                text: text.into(),
            },
        }
    }
}

/// Message action payload for a quick-reply item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub label: String,
    pub text: String,
}

/// Messaging transport errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Reply token already used or expired.
    #[error("reply token invalid or expired")]
    InvalidReplyToken,

    /// Platform rejected the request (4xx).
    #[error("request rejected: {message}")]
    Rejected { message: String },

    /// Platform unavailable (5xx).
    #[error("platform unavailable: {message}")]
    Unavailable { message: String },

    /// Network error during delivery.
    #[error("network error: {0}")]
    Network(String),
}

impl TransportError {
    /// Creates a rejected error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// True when the failure is specifically a dead reply token, the one
    /// case the dispatcher can recover from via push.
    pub fn is_invalid_reply_token(&self) -> bool {
        matches!(self, TransportError::InvalidReplyToken)
    }
}
