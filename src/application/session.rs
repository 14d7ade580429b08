//! Session Store - process-wide map from user id to conversation state.
//!
//! Constructed once at startup and passed by reference into the router so
//! the routing logic stays testable in isolation. Entries are created
//! lazily on first access and live for the process lifetime; expiry resets
//! fields, never removes entries.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::UserState;
use crate::domain::foundation::UserId;

/// Shared mutable store of per-user conversation state.
///
/// A single lock coordinates concurrent webhook calls; per-entry
/// consistency beyond last-write-wins is not required since a user sends
/// one message at a time.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    states: Arc<RwLock<HashMap<UserId, UserState>>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against the user's state, creating an idle record first if
    /// none exists. The closure must not block; async work happens outside
    /// the lock.
    pub async fn with_state<F, R>(&self, user_id: &UserId, f: F) -> R
    where
        F: FnOnce(&mut UserState) -> R,
    {
        let mut states = self.states.write().await;
        let state = states.entry(user_id.clone()).or_default();
        f(state)
    }

    /// Force-resets the user's state to idle.
    pub async fn reset(&self, user_id: &UserId) {
        self.with_state(user_id, |state| state.reset()).await;
    }

    /// Copy of the user's current state (idle if never seen).
    pub async fn snapshot(&self, user_id: &UserId) -> UserState {
        let states = self.states.read().await;
        states.get(user_id).cloned().unwrap_or_default()
    }

    /// Number of tracked users.
    pub async fn user_count(&self) -> usize {
        self.states.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Intent;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn entry_is_created_lazily() {
        let store = SessionStore::new();
        assert_eq!(store.user_count().await, 0);

        store.with_state(&user("U-1"), |_| ()).await;
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn snapshot_of_unknown_user_is_idle() {
        let store = SessionStore::new();
        let snapshot = store.snapshot(&user("U-ghost")).await;

        assert_eq!(snapshot.current_intent(), None);
        assert!(!snapshot.awaiting_input());
    }

    #[tokio::test]
    async fn mutations_persist_across_calls() {
        let store = SessionStore::new();
        let u = user("U-1");

        store
            .with_state(&u, |s| s.set_state(Intent::Compare, true))
            .await;

        let snapshot = store.snapshot(&u).await;
        assert_eq!(snapshot.current_intent(), Some(Intent::Compare));
        assert!(snapshot.awaiting_input());
    }

    #[tokio::test]
    async fn reset_returns_user_to_idle() {
        let store = SessionStore::new();
        let u = user("U-1");

        store
            .with_state(&u, |s| s.set_state(Intent::Ranking, true))
            .await;
        store.reset(&u).await;

        let snapshot = store.snapshot(&u).await;
        assert_eq!(snapshot.current_intent(), None);
        // The record itself survives the reset.
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_access_does_not_corrupt_the_map() {
        let store = SessionStore::new();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let u = user(&format!("U-{}", i));
                for _ in 0..50 {
                    store
                        .with_state(&u, |s| s.set_state(Intent::SpecQuery, true))
                        .await;
                    store.reset(&u).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.user_count().await, 8);
    }
}
