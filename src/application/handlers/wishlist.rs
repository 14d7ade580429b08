//! Wishlist commands: add, view, remove, clear.
//!
//! Independent of conversation state; the router dispatches these before
//! any slot-filling continuation. Uniqueness is by exact name match,
//! case-sensitive, no normalization.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::wishlist::WishlistItem;
use crate::ports::{OutgoingMessage, WishlistStore, WishlistStoreError};

const EMPTY_LIST_REPLY: &str = "您的願望清單是空的。";

const LIST_FOOTER: &str = "\n要移除項目，請輸入「移除+產品名稱」\n要清空清單，請輸入「清空購物車」";

/// Wishlist command handlers over the persistent store.
#[derive(Clone)]
pub struct WishlistCommands {
    store: Arc<dyn WishlistStore>,
}

impl WishlistCommands {
    /// Creates the command handlers over the given store.
    pub fn new(store: Arc<dyn WishlistStore>) -> Self {
        Self { store }
    }

    /// Adds `product_name`, rejecting an exact duplicate.
    pub async fn add(
        &self,
        user_id: &UserId,
        product_name: &str,
    ) -> Result<Vec<OutgoingMessage>, WishlistStoreError> {
        let mut items = self.store.load(user_id).await?;

        if items.iter().any(|item| item.name == product_name) {
            return Ok(vec![OutgoingMessage::text(format!(
                "產品 '{}' 已在您的願望清單中。",
                product_name
            ))]);
        }

        items.push(WishlistItem::new(product_name));
        self.store.save(user_id, &items).await?;

        Ok(vec![OutgoingMessage::text(format!(
            "已將 '{}' 添加到您的願望清單。",
            product_name
        ))])
    }

    /// Renders the numbered wishlist, or the empty-list message.
    pub async fn view(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<OutgoingMessage>, WishlistStoreError> {
        let items = self.store.load(user_id).await?;

        if items.is_empty() {
            return Ok(vec![OutgoingMessage::text(EMPTY_LIST_REPLY)]);
        }

        let mut text = String::from("🛒 您的願望清單：\n\n");
        for (index, item) in items.iter().enumerate() {
            text.push_str(&format!("{}. {}\n", index + 1, item.name));
        }
        text.push_str(LIST_FOOTER);

        Ok(vec![OutgoingMessage::text(text)])
    }

    /// Removes `product_name` if present.
    pub async fn remove(
        &self,
        user_id: &UserId,
        product_name: &str,
    ) -> Result<Vec<OutgoingMessage>, WishlistStoreError> {
        let items = self.store.load(user_id).await?;

        if items.is_empty() {
            return Ok(vec![OutgoingMessage::text(EMPTY_LIST_REPLY)]);
        }

        let remaining: Vec<WishlistItem> = items
            .iter()
            .filter(|item| item.name != product_name)
            .cloned()
            .collect();

        if remaining.len() == items.len() {
            return Ok(vec![OutgoingMessage::text(format!(
                "未在您的願望清單中找到 '{}'。",
                product_name
            ))]);
        }

        self.store.save(user_id, &remaining).await?;

        Ok(vec![OutgoingMessage::text(format!(
            "已從您的願望清單中移除 '{}'。",
            product_name
        ))])
    }

    /// Empties the wishlist regardless of prior contents.
    pub async fn clear(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<OutgoingMessage>, WishlistStoreError> {
        self.store.save(user_id, &[]).await?;
        Ok(vec![OutgoingMessage::text("已清空您的願望清單。")])
    }
}
