//! Wishlist Store Port - persistent per-user wishlist collections.

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::wishlist::WishlistItem;

/// Port for loading and saving one ordered wishlist per user.
///
/// A user with no stored wishlist loads as an empty list. Saves are
/// last-write-wins per user; there is no cross-process locking.
#[async_trait]
pub trait WishlistStore: Send + Sync {
    /// Loads the user's wishlist, empty if none was ever saved.
    async fn load(&self, user_id: &UserId) -> Result<Vec<WishlistItem>, WishlistStoreError>;

    /// Replaces the user's wishlist.
    async fn save(
        &self,
        user_id: &UserId,
        items: &[WishlistItem],
    ) -> Result<(), WishlistStoreError>;
}

/// Wishlist store errors.
#[derive(Debug, thiserror::Error)]
pub enum WishlistStoreError {
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(String),

    /// Stored file could not be parsed.
    #[error("corrupt wishlist data: {0}")]
    Corrupt(String),
}

impl WishlistStoreError {
    /// Creates an io error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Creates a corrupt-data error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt(message.into())
    }
}
