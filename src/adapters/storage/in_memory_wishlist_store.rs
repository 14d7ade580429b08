//! In-Memory Wishlist Store Adapter
//!
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::domain::wishlist::WishlistItem;
use crate::ports::{WishlistStore, WishlistStoreError};

/// In-memory storage for per-user wishlists.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWishlistStore {
    lists: Arc<RwLock<HashMap<UserId, Vec<WishlistItem>>>>,
}

impl InMemoryWishlistStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored lists
    pub async fn list_count(&self) -> usize {
        self.lists.read().await.len()
    }
}

#[async_trait]
impl WishlistStore for InMemoryWishlistStore {
    async fn load(&self, user_id: &UserId) -> Result<Vec<WishlistItem>, WishlistStoreError> {
        let lists = self.lists.read().await;
        Ok(lists.get(user_id).cloned().unwrap_or_default())
    }

    async fn save(
        &self,
        user_id: &UserId,
        items: &[WishlistItem],
    ) -> Result<(), WishlistStoreError> {
        let mut lists = self.lists.write().await;
        lists.insert(user_id.clone(), items.to_vec());
        Ok(())
    }
}
