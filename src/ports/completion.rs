//! Completion Service Port - Interface for the hosted LLM completion API.
//!
//! Abstracts the chat-completion endpoint (with optional web-search
//! augmentation) so intent handlers can generate answers without coupling
//! to a specific provider. Transient failures are classified for the
//! adapter's retry loop via [`CompletionError::is_retryable`].

use async_trait::async_trait;

/// Port for single-shot chat completions.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generates one text completion for a system + user prompt pair.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

/// Request for a chat completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction guiding model behavior.
    pub system_prompt: String,
    /// User instruction embedding the query text.
    pub user_prompt: String,
    /// Model identifier; `None` uses the adapter's default.
    pub model: Option<String>,
    /// Token budget for the generated answer.
    pub max_tokens: u32,
    /// Whether to enable web-search augmentation.
    pub web_search: bool,
}

impl CompletionRequest {
    /// Creates a request with the default token budget and search enabled.
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            model: None,
            max_tokens: 1000,
            web_search: true,
        }
    }

    /// Overrides the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Overrides the token budget.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// Enables or disables web-search augmentation.
    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }
}

/// Completion service errors.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable (5xx).
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request rejected as invalid (4xx other than auth/rate).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl CompletionError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
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

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if a retry with backoff can reasonably succeed.
    ///
    /// Content-level failures (auth, invalid request, parse) never retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::RateLimited { .. }
                | CompletionError::Unavailable { .. }
                | CompletionError::Network(_)
                | CompletionError::Timeout { .. }
        )
    }
}
