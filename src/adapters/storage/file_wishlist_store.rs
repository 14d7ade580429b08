//! File-based Wishlist Store Adapter
//!
//! Stores one JSON file per user under a base directory. Writes are
//! last-write-wins per user; a missing file loads as an empty list.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::UserId;
use crate::domain::wishlist::WishlistItem;
use crate::ports::{WishlistStore, WishlistStoreError};

/// File-based storage for per-user wishlists.
#[derive(Debug, Clone)]
pub struct FileWishlistStore {
    base_path: PathBuf,
}

impl FileWishlistStore {
    /// Create a new file store with a base directory
    ///
    /// # Arguments
    /// * `base_path` - The root directory for storing wishlist files
    ///
    /// # Example
    /// ```ignore
    /// let store = FileWishlistStore::new("./data/wishlists");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the wishlist file path for a user
    fn wishlist_path(&self, user_id: &UserId) -> PathBuf {
        self.base_path.join(format!("{}.json", user_id))
    }

    /// Ensure the base directory exists
    async fn ensure_dir(&self) -> Result<(), WishlistStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| WishlistStoreError::io(e.to_string()))
    }
}

#[async_trait]
impl WishlistStore for FileWishlistStore {
    async fn load(&self, user_id: &UserId) -> Result<Vec<WishlistItem>, WishlistStoreError> {
        let path = self.wishlist_path(user_id);

        if !path.exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&path)
            .await
            .map_err(|e| WishlistStoreError::io(e.to_string()))?;

        serde_json::from_str(&json).map_err(|e| WishlistStoreError::corrupt(e.to_string()))
    }

    async fn save(
        &self,
        user_id: &UserId,
        items: &[WishlistItem],
    ) -> Result<(), WishlistStoreError> {
        self.ensure_dir().await?;

        let path = self.wishlist_path(user_id);
        let json = serde_json::to_string_pretty(items)
            .map_err(|e| WishlistStoreError::corrupt(e.to_string()))?;

        fs::write(&path, json)
            .await
            .map_err(|e| WishlistStoreError::io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_user() -> UserId {
        UserId::new("U-test").unwrap()
    }

    #[tokio::test]
    async fn load_missing_file_returns_empty_list() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileWishlistStore::new(temp_dir.path());

        let items = store.load(&test_user()).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn save_and_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileWishlistStore::new(temp_dir.path());
        let user = test_user();

        let items = vec![WishlistItem::new("iPhone 15"), WishlistItem::new("Pixel 9")];
        store.save(&user, &items).await.unwrap();

        let loaded = store.load(&user).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "iPhone 15");
        assert_eq!(loaded[1].name, "Pixel 9");
    }

    #[tokio::test]
    async fn save_overwrites_previous_list() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileWishlistStore::new(temp_dir.path());
        let user = test_user();

        store
            .save(&user, &[WishlistItem::new("old")])
            .await
            .unwrap();
        store
            .save(&user, &[WishlistItem::new("new")])
            .await
            .unwrap();

        let loaded = store.load(&user).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "new");
    }

    #[tokio::test]
    async fn users_have_separate_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileWishlistStore::new(temp_dir.path());

        let alice = UserId::new("U-alice").unwrap();
        let bob = UserId::new("U-bob").unwrap();

        store
            .save(&alice, &[WishlistItem::new("A")])
            .await
            .unwrap();
        store.save(&bob, &[WishlistItem::new("B")]).await.unwrap();

        assert_eq!(store.load(&alice).await.unwrap()[0].name, "A");
        assert_eq!(store.load(&bob).await.unwrap()[0].name, "B");
    }

    #[tokio::test]
    async fn corrupt_file_reports_corrupt_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileWishlistStore::new(temp_dir.path());
        let user = test_user();

        tokio::fs::write(store.wishlist_path(&user), "not json")
            .await
            .unwrap();

        let result = store.load(&user).await;
        assert!(matches!(result, Err(WishlistStoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn base_dir_is_created_on_first_save() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("data").join("wishlists");
        let store = FileWishlistStore::new(&nested);

        store
            .save(&test_user(), &[WishlistItem::new("X")])
            .await
            .unwrap();

        assert!(nested.exists());
    }
}
