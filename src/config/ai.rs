//! Completion service configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Completion service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: SecretString,

    /// Base URL for the completions API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Search-enabled model for spec/price/compare/review queries
    #[serde(default = "default_search_model")]
    pub search_model: String,

    /// Larger search-enabled model for recommend/ranking queries
    #[serde(default = "default_wide_search_model")]
    pub wide_search_model: String,

    /// Token budget per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    /// Expose the API key for Authorization headers.
    pub fn api_key(&self) -> &str {
        self.openai_api_key.expose_secret()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key().is_empty() {
            return Err(ValidationError::MissingRequired("AI__OPENAI_API_KEY"));
        }
        if !self.api_base_url.starts_with("http") {
            return Err(ValidationError::InvalidApiBaseUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_search_model() -> String {
    "gpt-4o-mini-search-preview".to_string()
}

fn default_wide_search_model() -> String {
    "gpt-4o-search-preview".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    3
}
