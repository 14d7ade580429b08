//! Reply Dispatcher - failure-tolerant outbound delivery.
//!
//! Every outbound reply goes through here: reply-by-token first, push
//! fallback when the token has expired, and transport failures logged but
//! never raised. A webhook turn therefore cannot fail because of delivery.

use std::sync::Arc;

use crate::domain::foundation::{ReplyToken, UserId};
use crate::ports::{MessagingTransport, OutgoingMessage};

/// Wraps the messaging transport with the delivery policy.
#[derive(Clone)]
pub struct ReplyDispatcher {
    transport: Arc<dyn MessagingTransport>,
}

impl ReplyDispatcher {
    /// Creates a dispatcher over the given transport.
    pub fn new(transport: Arc<dyn MessagingTransport>) -> Self {
        Self { transport }
    }

    /// Delivers `messages`, returning whether anything reached the user.
    ///
    /// Reply tokens are single-use and expire quickly; on the
    /// invalid-token error the messages are re-sent as a push addressed by
    /// user id. All other failures are logged and swallowed.
    pub async fn deliver(
        &self,
        token: &ReplyToken,
        user_id: &UserId,
        messages: &[OutgoingMessage],
    ) -> bool {
        if messages.is_empty() {
            return true;
        }

        match self.transport.reply(token, messages).await {
            Ok(()) => true,
            Err(err) if err.is_invalid_reply_token() => {
                tracing::warn!(
                    user_id = %user_id,
                    "reply token invalid or expired, falling back to push"
                );
                match self.transport.push(user_id, messages).await {
                    Ok(()) => true,
                    Err(push_err) => {
                        tracing::warn!(
                            user_id = %user_id,
                            error = %push_err,
                            "push fallback failed, user receives no reply this turn"
                        );
                        false
                    }
                }
            }
            Err(err) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %err,
                    "reply delivery failed"
                );
                false
            }
        }
    }
}
