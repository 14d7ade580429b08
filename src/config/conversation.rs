//! Conversation state machine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Conversation tuning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// Seconds of inactivity after which a pending state is reset.
    #[serde(default = "default_state_timeout")]
    pub state_timeout_secs: u64,

    /// Maximum reply length before truncation, in characters.
    #[serde(default = "default_max_reply_chars")]
    pub max_reply_chars: usize,

    /// Which heuristic decides whether a recommend query is in-domain.
    #[serde(default)]
    pub domain_policy: DomainPolicy,
}

/// Authoritative heuristic for the recommend flow's 3C domain check.
///
/// The model's own judgment misclassifies some valid device types, so the
/// keyword list is the default source of truth.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DomainPolicy {
    #[default]
    KeywordList,
    ModelJudgment,
}

impl ConversationConfig {
    /// State expiry timeout as Duration
    pub fn state_timeout(&self) -> Duration {
        Duration::from_secs(self.state_timeout_secs)
    }

    /// Validate conversation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.state_timeout_secs == 0 {
            return Err(ValidationError::InvalidStateTimeout);
        }
        if self.max_reply_chars == 0 {
            return Err(ValidationError::InvalidReplyLimit);
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            state_timeout_secs: default_state_timeout(),
            max_reply_chars: default_max_reply_chars(),
            domain_policy: DomainPolicy::default(),
        }
    }
}

fn default_state_timeout() -> u64 {
    1800
}

fn default_max_reply_chars() -> usize {
    4500
}
