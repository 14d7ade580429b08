//! Wishlist storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Wishlist storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WishlistConfig {
    /// Directory holding one JSON file per user.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl WishlistConfig {
    /// Validate wishlist configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dir.as_os_str().is_empty() {
            return Err(ValidationError::InvalidWishlistDir);
        }
        Ok(())
    }
}

impl Default for WishlistConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("data/wishlists")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dir() {
        let config = WishlistConfig::default();
        assert_eq!(config.dir, PathBuf::from("data/wishlists"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_dir_fails() {
        let config = WishlistConfig {
            dir: PathBuf::new(),
        };
        assert!(config.validate().is_err());
    }
}
