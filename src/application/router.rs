//! Command Router - first-match decision logic for every inbound message.
//!
//! For each `(user_id, text)` pair the router produces exactly one
//! outcome: a direct reply (global commands), a state transition plus a
//! prompt-for-input reply, or a delegation into an intent handler. The
//! decision order is a strict contract:
//!
//! 1. expired state is reset (side effect only)
//! 2. cancel keyword
//! 3. help keyword
//! 4. wishlist commands
//! 5. in-progress slot continuation
//! 6. top-level intent keywords
//! 7. fallback "not understood" reply

use std::time::Duration;

use crate::config::ConversationConfig;
use crate::domain::conversation::{Intent, CONTEXT_DEVICE_TYPE};
use crate::domain::foundation::UserId;
use crate::ports::{OutgoingMessage, WishlistStoreError};

use super::handlers::{
    compare, price_query, ranking, recommend, review, spec_query, HandlerContext,
    WishlistCommands,
};
use super::session::SessionStore;

const CMD_LEAVE: &str = "離開";
const CMD_HELP: &str = "說明";
const CMD_WISHLIST_VIEW: &str = "查看我的車車";
const CMD_WISHLIST_REMOVE_PREFIX: &str = "移除";
const CMD_WISHLIST_CLEAR: &str = "清空購物車";

const REPLY_LEFT: &str = "已退出當前功能。輸入「說明」查看可用指令。";
const REPLY_UNKNOWN: &str = "我不明白您的指令。請輸入「說明」查看可用功能。";
const REPLY_DECLINED: &str = "好的，未添加到願望清單。";
const REPLY_EMPTY_SLOT: &str = "輸入不可為空，請重新輸入：";
const REPLY_INTERNAL_ERROR: &str = "處理您的訊息時發生錯誤，請再試一次。";

const HELP_TEXT: &str = "\
🤖 3C小助手功能說明：

1. 產品規格查詢: 輸入「查詢裝置」
2. 產品價格查詢: 輸入「我想查詢價格」
3. 產品比較: 輸入「大車拼」
4. 推薦產品: 輸入「求推薦」
5. 熱門排行: 輸入「金榜題名」
6. 產品評價: 輸入「評價大師」

🛒 願望清單功能：
- 查看: 輸入「查看我的車車」
- 移除: 輸入「移除+產品名稱」
- 清空: 輸入「清空購物車」

❓ 其他指令：
- 「說明」- 顯示此說明
- 「離開」- 終止目前程序";

/// Prompt-for-input text shown when a top-level intent is selected.
fn prompt_for(intent: Intent) -> &'static str {
    match intent {
        Intent::SpecQuery => "請輸入您想查詢的裝置型號：",
        Intent::PriceQuery => "請輸入您想查詢價格的裝置型號：",
        Intent::Compare => "請輸入您想比較的兩種裝置型號，以逗號分隔：",
        Intent::RecommendType => "請輸入您想推薦的裝置類型（例如：手機、筆電、耳機等）：",
        Intent::Recommend => "請輸入您的需求和預算：",
        Intent::Ranking => "請輸入您想查詢的產品類型（例如：手機）：",
        Intent::Review => "請輸入您想查詢評價的裝置型號：",
    }
}

/// Internal routing failure; converted to a generic reply plus a state
/// force-reset at the top of message handling.
#[derive(Debug, thiserror::Error)]
enum RouteError {
    #[error(transparent)]
    Wishlist(#[from] WishlistStoreError),
}

/// Routes inbound messages through the conversation state machine.
pub struct Router {
    sessions: SessionStore,
    handlers: HandlerContext,
    wishlist: WishlistCommands,
    state_timeout: Duration,
}

impl Router {
    /// Creates a router over the given session store and collaborators.
    pub fn new(
        sessions: SessionStore,
        handlers: HandlerContext,
        wishlist: WishlistCommands,
        conversation: &ConversationConfig,
    ) -> Self {
        Self {
            sessions,
            handlers,
            wishlist,
            state_timeout: conversation.state_timeout(),
        }
    }

    /// Handles one inbound message, producing the reply messages.
    ///
    /// Never fails: unexpected internal errors are logged, the user's
    /// state is force-reset so they are not stuck awaiting input, and a
    /// generic retry reply is returned.
    pub async fn handle_message(&self, user_id: &UserId, text: &str) -> Vec<OutgoingMessage> {
        match self.route(user_id, text).await {
            Ok(messages) => messages,
            Err(err) => {
                tracing::error!(
                    user_id = %user_id,
                    error = %err,
                    "message handling failed, force-resetting state"
                );
                self.sessions.reset(user_id).await;
                vec![OutgoingMessage::text(REPLY_INTERNAL_ERROR)]
            }
        }
    }

    async fn route(
        &self,
        user_id: &UserId,
        text: &str,
    ) -> Result<Vec<OutgoingMessage>, RouteError> {
        // 1. Reset expired state before any other processing. Side effect
        //    only; command handling continues with the reset state.
        let (awaiting, pending_intent, device_type) = self
            .sessions
            .with_state(user_id, |state| {
                if state.is_expired(self.state_timeout) {
                    tracing::debug!(user_id = %user_id, "state expired, resetting");
                    state.reset();
                }
                (
                    state.awaiting_input(),
                    state.current_intent(),
                    state.get_context(CONTEXT_DEVICE_TYPE).map(str::to_string),
                )
            })
            .await;

        // 2. Cancel keyword overrides any in-progress slot filling.
        if text == CMD_LEAVE {
            self.sessions.reset(user_id).await;
            return Ok(vec![OutgoingMessage::text(REPLY_LEFT)]);
        }

        // 3. Help neither consults nor mutates state.
        if text == CMD_HELP {
            return Ok(vec![OutgoingMessage::text(HELP_TEXT)]);
        }

        // 4. Wishlist commands are independent of conversation state.
        if text == CMD_WISHLIST_VIEW {
            return Ok(self.wishlist.view(user_id).await?);
        }
        if let Some(name) = text.strip_prefix(CMD_WISHLIST_REMOVE_PREFIX) {
            return Ok(self.wishlist.remove(user_id, name.trim()).await?);
        }
        if text == CMD_WISHLIST_CLEAR {
            return Ok(self.wishlist.clear(user_id).await?);
        }
        if let Some(name) = text.strip_prefix(price_query::ADD_COMMAND_PREFIX) {
            return Ok(self.wishlist.add(user_id, name.trim()).await?);
        }
        if text == price_query::DECLINE_COMMAND {
            return Ok(vec![OutgoingMessage::text(REPLY_DECLINED)]);
        }

        // 5. Mid-flow input is a slot value, even if it happens to equal a
        //    top-level keyword.
        if awaiting {
            if let Some(intent) = pending_intent {
                return self
                    .continue_flow(user_id, intent, device_type.as_deref(), text)
                    .await;
            }
        }

        // 6. Top-level intent selection.
        if let Some(intent) = Intent::from_keyword(text) {
            self.sessions
                .with_state(user_id, |state| state.set_state(intent, true))
                .await;
            tracing::info!(user_id = %user_id, intent = %intent, "intent selected");
            return Ok(vec![OutgoingMessage::text(prompt_for(intent))]);
        }

        // 7. Fallback.
        Ok(vec![OutgoingMessage::text(REPLY_UNKNOWN)])
    }

    /// Consumes `text` as the slot value for `intent`.
    ///
    /// Terminal intents return to idle only after the handler produced its
    /// reply, success and error reply alike, so a user is never stuck in a
    /// turn that cannot complete.
    async fn continue_flow(
        &self,
        user_id: &UserId,
        intent: Intent,
        device_type: Option<&str>,
        text: &str,
    ) -> Result<Vec<OutgoingMessage>, RouteError> {
        let slot = text.trim();

        // Empty slot values get a corrective prompt; the flow stays open.
        if slot.is_empty() {
            return Ok(vec![OutgoingMessage::text(REPLY_EMPTY_SLOT)]);
        }

        tracing::info!(user_id = %user_id, intent = %intent, "dispatching slot value");

        let messages = match intent {
            Intent::RecommendType => {
                // Transient substate: stash the device type and ask for
                // requirements next. No handler runs on this turn.
                self.sessions
                    .with_state(user_id, |state| {
                        state.set_context(CONTEXT_DEVICE_TYPE, slot);
                        state.set_state(Intent::Recommend, true);
                    })
                    .await;
                return Ok(vec![OutgoingMessage::text(format!(
                    "請輸入您對{}的需求和預算：",
                    slot
                ))]);
            }
            Intent::SpecQuery => spec_query::handle(&self.handlers, slot).await,
            Intent::PriceQuery => price_query::handle(&self.handlers, slot).await,
            Intent::Compare => compare::handle(&self.handlers, slot).await,
            Intent::Recommend => {
                recommend::handle(&self.handlers, device_type.unwrap_or_default(), slot).await
            }
            Intent::Ranking => ranking::handle(&self.handlers, slot).await,
            Intent::Review => review::handle(&self.handlers, slot).await,
        };

        self.sessions.reset(user_id).await;
        Ok(messages)
    }
}
