//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `GADGET_CONCIERGE` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use gadget_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod conversation;
mod error;
mod line;
mod server;
mod wishlist;

pub use ai::AiConfig;
pub use conversation::{ConversationConfig, DomainPolicy};
pub use error::{ConfigError, ValidationError};
pub use line::LineConfig;
pub use server::{Environment, ServerConfig};
pub use wishlist::WishlistConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the Gadget Concierge bot.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// LINE channel configuration (credentials, endpoint)
    pub line: LineConfig,

    /// Completion service configuration (OpenAI)
    pub ai: AiConfig,

    /// Wishlist storage configuration
    #[serde(default)]
    pub wishlist: WishlistConfig,

    /// Conversation state machine configuration
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GADGET_CONCIERGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `GADGET_CONCIERGE__SERVER__PORT=5000` -> `server.port = 5000`
    /// - `GADGET_CONCIERGE__LINE__CHANNEL_SECRET=...` -> `line.channel_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GADGET_CONCIERGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.line.validate()?;
        self.ai.validate()?;
        self.wishlist.validate()?;
        self.conversation.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var("GADGET_CONCIERGE__LINE__CHANNEL_SECRET", "test-secret");
        env::set_var(
            "GADGET_CONCIERGE__LINE__CHANNEL_ACCESS_TOKEN",
            "test-token",
        );
        env::set_var("GADGET_CONCIERGE__AI__OPENAI_API_KEY", "sk-test");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("GADGET_CONCIERGE__LINE__CHANNEL_SECRET");
        env::remove_var("GADGET_CONCIERGE__LINE__CHANNEL_ACCESS_TOKEN");
        env::remove_var("GADGET_CONCIERGE__AI__OPENAI_API_KEY");
        env::remove_var("GADGET_CONCIERGE__SERVER__PORT");
        env::remove_var("GADGET_CONCIERGE__SERVER__ENVIRONMENT");
        env::remove_var("GADGET_CONCIERGE__CONVERSATION__DOMAIN_POLICY");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.line.channel_secret(), "test-secret");
        assert_eq!(config.ai.api_key(), "sk-test");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok());
        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.conversation.state_timeout_secs, 1800);
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("GADGET_CONCIERGE__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_domain_policy_from_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var(
            "GADGET_CONCIERGE__CONVERSATION__DOMAIN_POLICY",
            "model_judgment",
        );
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.conversation.domain_policy, DomainPolicy::ModelJudgment);
    }
}
