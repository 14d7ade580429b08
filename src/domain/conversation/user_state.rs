//! Per-user finite-state record for the conversation state machine.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use super::Intent;

/// Context key under which the recommend flow stashes the device type.
pub const CONTEXT_DEVICE_TYPE: &str = "device_type";

/// Per-user conversation state.
///
/// Invariant: `awaiting_input == true` implies `current_intent.is_some()`.
/// All mutations refresh `last_activity_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserState {
    current_intent: Option<Intent>,
    awaiting_input: bool,
    context: HashMap<String, String>,
    last_activity_at: Timestamp,
}

impl UserState {
    /// Creates an idle state with activity stamped now.
    pub fn new() -> Self {
        Self {
            current_intent: None,
            awaiting_input: false,
            context: HashMap::new(),
            last_activity_at: Timestamp::now(),
        }
    }

    /// Currently selected intent, if any.
    pub fn current_intent(&self) -> Option<Intent> {
        self.current_intent
    }

    /// Whether the next message must be treated as a slot value.
    pub fn awaiting_input(&self) -> bool {
        self.awaiting_input
    }

    /// Last mutation time.
    pub fn last_activity_at(&self) -> Timestamp {
        self.last_activity_at
    }

    /// Overwrites the intent and awaiting flag, refreshing activity.
    pub fn set_state(&mut self, intent: Intent, awaiting_input: bool) {
        self.current_intent = Some(intent);
        self.awaiting_input = awaiting_input;
        self.touch();
    }

    /// Returns to idle: no intent, not awaiting, context cleared.
    pub fn reset(&mut self) {
        self.current_intent = None;
        self.awaiting_input = false;
        self.context.clear();
        self.touch();
    }

    /// Stores a context value, refreshing activity.
    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.insert(key.into(), value.into());
        self.touch();
    }

    /// Reads a context value.
    pub fn get_context(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    /// True iff the last activity is older than `timeout`.
    pub fn is_expired(&self, timeout: Duration) -> bool {
        let idle = Timestamp::now().secs_since(&self.last_activity_at);
        idle > timeout.as_secs() as i64
    }

    /// Checks the state-machine invariant; used by tests after every
    /// router decision.
    pub fn invariant_holds(&self) -> bool {
        !self.awaiting_input || self.current_intent.is_some()
    }

    fn touch(&mut self) {
        self.last_activity_at = Timestamp::now();
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, secs: u64) {
        self.last_activity_at = self.last_activity_at.minus_secs(secs);
    }
}

impl Default for UserState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_idle() {
        let state = UserState::new();
        assert_eq!(state.current_intent(), None);
        assert!(!state.awaiting_input());
        assert!(state.invariant_holds());
    }

    #[test]
    fn set_state_records_intent_and_flag() {
        let mut state = UserState::new();
        state.set_state(Intent::Compare, true);

        assert_eq!(state.current_intent(), Some(Intent::Compare));
        assert!(state.awaiting_input());
        assert!(state.invariant_holds());
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = UserState::new();
        state.set_state(Intent::Recommend, true);
        state.set_context(CONTEXT_DEVICE_TYPE, "耳機");

        state.reset();

        assert_eq!(state.current_intent(), None);
        assert!(!state.awaiting_input());
        assert_eq!(state.get_context(CONTEXT_DEVICE_TYPE), None);
        assert!(state.invariant_holds());
    }

    #[test]
    fn context_round_trips() {
        let mut state = UserState::new();
        state.set_context(CONTEXT_DEVICE_TYPE, "筆電");

        assert_eq!(state.get_context(CONTEXT_DEVICE_TYPE), Some("筆電"));
        assert_eq!(state.get_context("missing"), None);
    }

    #[test]
    fn fresh_state_is_never_expired() {
        let state = UserState::new();
        assert!(!state.is_expired(Duration::from_secs(1800)));
        // Even a zero timeout needs elapsed time strictly greater.
        assert!(!state.is_expired(Duration::from_secs(60)));
    }

    #[test]
    fn backdated_state_expires() {
        let mut state = UserState::new();
        state.backdate(1801);
        assert!(state.is_expired(Duration::from_secs(1800)));
    }

    #[test]
    fn mutation_refreshes_activity() {
        let mut state = UserState::new();
        state.backdate(1801);
        assert!(state.is_expired(Duration::from_secs(1800)));

        state.set_state(Intent::Ranking, true);
        assert!(!state.is_expired(Duration::from_secs(1800)));
    }
}
