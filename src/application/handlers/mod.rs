//! Intent handlers.
//!
//! Each handler builds a fixed system instruction plus a user instruction
//! embedding the slot text, asks the completion service, and returns the
//! answer as reply messages. Completion failures become a single
//! user-visible error reply; they never propagate to the router.

pub mod compare;
pub mod price_query;
pub mod ranking;
pub mod recommend;
pub mod review;
pub mod spec_query;
pub mod wishlist;

use std::sync::Arc;

use crate::config::{AiConfig, ConversationConfig, DomainPolicy};
use crate::ports::{CompletionError, CompletionRequest, CompletionService, OutgoingMessage};

pub use wishlist::WishlistCommands;

/// Marker appended when a reply exceeds the transport size limit.
pub const TRUNCATION_MARKER: &str = "…（訊息已截斷）";

/// Shared dependencies and tuning for the intent handlers.
#[derive(Clone)]
pub struct HandlerContext {
    completion: Arc<dyn CompletionService>,
    /// Search-enabled model for spec/price/compare/review queries.
    pub search_model: String,
    /// Larger search-enabled model for recommend/ranking queries.
    pub wide_search_model: String,
    /// Token budget per completion.
    pub max_tokens: u32,
    /// Reply size limit before truncation, in characters.
    pub max_reply_chars: usize,
    /// Heuristic for the recommend flow's domain check.
    pub domain_policy: DomainPolicy,
}

impl HandlerContext {
    /// Creates a context from configuration sections.
    pub fn new(
        completion: Arc<dyn CompletionService>,
        ai: &AiConfig,
        conversation: &ConversationConfig,
    ) -> Self {
        Self {
            completion,
            search_model: ai.search_model.clone(),
            wide_search_model: ai.wide_search_model.clone(),
            max_tokens: ai.max_tokens,
            max_reply_chars: conversation.max_reply_chars,
            domain_policy: conversation.domain_policy,
        }
    }

    /// Asks the completion service, converting failures into an error
    /// reply prefixed with the handler's diagnostic text.
    pub async fn ask(
        &self,
        system_prompt: &str,
        user_prompt: String,
        model: &str,
        error_prefix: &str,
    ) -> Result<String, OutgoingMessage> {
        let request = CompletionRequest::new(system_prompt, user_prompt)
            .with_model(model)
            .with_max_tokens(self.max_tokens);

        match self.completion.complete(request).await {
            Ok(text) => Ok(truncate_reply(&text, self.max_reply_chars)),
            Err(err) => {
                tracing::warn!(error = %err, "completion request failed");
                Err(OutgoingMessage::text(format!(
                    "{}{}",
                    error_prefix,
                    diagnostic(&err)
                )))
            }
        }
    }
}

/// Short user-facing diagnostic for a completion failure.
fn diagnostic(err: &CompletionError) -> &'static str {
    match err {
        CompletionError::Timeout { .. } => "查詢逾時，請稍後再試",
        CompletionError::RateLimited { .. } => "查詢次數過多，請稍後再試",
        CompletionError::Network(_) | CompletionError::Unavailable { .. } => {
            "服務暫時無法使用，請稍後再試"
        }
        CompletionError::AuthenticationFailed
        | CompletionError::Parse(_)
        | CompletionError::InvalidRequest(_) => "服務回應異常，請稍後再試",
    }
}

/// Truncates `text` to `max_chars` characters, appending the truncation
/// marker when anything was cut. Character-based so multi-byte text is
/// never split mid-codepoint.
pub fn truncate_reply(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// Builds a context over a mock completion service for handler tests.
#[cfg(test)]
pub(crate) fn test_context(
    completion: crate::adapters::mock::MockCompletionService,
) -> HandlerContext {
    HandlerContext {
        completion: Arc::new(completion),
        search_model: "mini-search".to_string(),
        wide_search_model: "wide-search".to_string(),
        max_tokens: 1000,
        max_reply_chars: 4500,
        domain_policy: DomainPolicy::KeywordList,
    }
}
