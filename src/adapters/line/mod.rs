//! LINE Messaging Adapter - Implementation of MessagingTransport.
//!
//! Handles webhook signature verification, reply delivery, and push
//! delivery against the LINE Messaging API.
//!
//! # Security
//!
//! Webhook bodies are authenticated with HMAC-SHA256 over the raw request
//! body using the channel secret as key. The platform sends the signature
//! base64-encoded in the `X-Line-Signature` header; comparison is
//! constant-time.

mod webhook;

pub use webhook::{InboundEvent, InboundMessage, WebhookPayload};

use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::LineConfig;
use crate::domain::foundation::{ReplyToken, UserId};
use crate::ports::{MessagingTransport, OutgoingMessage, TransportError};

type HmacSha256 = Hmac<Sha256>;

/// Configuration for the LINE transport adapter.
#[derive(Clone)]
pub struct LineApiConfig {
    /// Channel secret (webhook signature key).
    channel_secret: Secret<String>,
    /// Channel access token (bearer credential for reply/push).
    access_token: Secret<String>,
    /// Base URL for the messaging API.
    pub base_url: String,
}

impl LineApiConfig {
    /// Creates a new configuration.
    pub fn new(channel_secret: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            channel_secret: Secret::new(channel_secret.into()),
            access_token: Secret::new(access_token.into()),
            base_url: "https://api.line.me".to_string(),
        }
    }

    /// Sets a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl From<&LineConfig> for LineApiConfig {
    fn from(cfg: &LineConfig) -> Self {
        LineApiConfig::new(cfg.channel_secret(), cfg.channel_access_token())
            .with_base_url(cfg.api_base_url.clone())
    }
}

/// LINE Messaging API adapter.
pub struct LineTransport {
    config: LineApiConfig,
    client: Client,
}

impl LineTransport {
    /// Creates a new transport with the given configuration.
    pub fn new(config: LineApiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn reply_url(&self) -> String {
        format!("{}/v2/bot/message/reply", self.config.base_url)
    }

    fn push_url(&self) -> String {
        format!("{}/v2/bot/message/push", self.config.base_url)
    }

    async fn post_messages<T: Serialize>(
        &self,
        url: String,
        body: &T,
    ) -> Result<(), TransportError> {
        let response = self
            .client
            .post(url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.access_token.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();

        // The platform reports a used or expired reply token as a 400 with
        // a fixed message.
        if status.as_u16() == 400 && error_body.contains("Invalid reply token") {
            return Err(TransportError::InvalidReplyToken);
        }

        match status.as_u16() {
            400..=499 => Err(TransportError::rejected(format!(
                "{}: {}",
                status, error_body
            ))),
            500..=599 => Err(TransportError::unavailable(format!(
                "{}: {}",
                status, error_body
            ))),
            _ => Err(TransportError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }
}

#[async_trait]
impl MessagingTransport for LineTransport {
    fn verify_signature(&self, body: &[u8], signature: &str) -> bool {
        verify_line_signature(self.config.channel_secret.expose_secret(), body, signature)
    }

    async fn reply(
        &self,
        token: &ReplyToken,
        messages: &[OutgoingMessage],
    ) -> Result<(), TransportError> {
        let body = ReplyBody {
            reply_token: token.as_str(),
            messages,
        };
        self.post_messages(self.reply_url(), &body).await
    }

    async fn push(
        &self,
        user_id: &UserId,
        messages: &[OutgoingMessage],
    ) -> Result<(), TransportError> {
        let body = PushBody {
            to: user_id.as_str(),
            messages,
        };
        self.post_messages(self.push_url(), &body).await
    }
}

/// Verifies a LINE webhook signature.
///
/// The signature header carries base64(HMAC-SHA256(channel_secret, body)).
pub fn verify_line_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let expected = match base64::engine::general_purpose::STANDARD.decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(body);
    let computed = mac.finalize().into_bytes();

    computed.as_slice().ct_eq(expected.as_slice()).into()
}

#[derive(Serialize)]
struct ReplyBody<'a> {
    #[serde(rename = "replyToken")]
    reply_token: &'a str,
    messages: &'a [OutgoingMessage],
}

#[derive(Serialize)]
struct PushBody<'a> {
    to: &'a str,
    messages: &'a [OutgoingMessage],
}
