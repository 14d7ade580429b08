//! LINE messaging channel configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// LINE channel credentials and endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LineConfig {
    /// Channel secret used to verify webhook signatures.
    pub channel_secret: SecretString,

    /// Channel access token used for reply/push calls.
    pub channel_access_token: SecretString,

    /// Base URL for the messaging API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl LineConfig {
    /// Expose the channel secret for HMAC computation.
    pub fn channel_secret(&self) -> &str {
        self.channel_secret.expose_secret()
    }

    /// Expose the access token for Authorization headers.
    pub fn channel_access_token(&self) -> &str {
        self.channel_access_token.expose_secret()
    }

    /// Validate LINE configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.channel_secret().is_empty() {
            return Err(ValidationError::MissingRequired("LINE__CHANNEL_SECRET"));
        }
        if self.channel_access_token().is_empty() {
            return Err(ValidationError::MissingRequired(
                "LINE__CHANNEL_ACCESS_TOKEN",
            ));
        }
        if !self.api_base_url.starts_with("http") {
            return Err(ValidationError::InvalidApiBaseUrl);
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.line.me".to_string()
}
