//! Conversation state store for the booking assistant
//!
//! Ephemeral, process-local and lost on restart. Entries idle for longer
//! than the TTL are dropped by [`ChatStore::sweep`], which the server runs
//! periodically as a background task.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use shared::models::{BookingDraft, ChatStep, ConversationState};
use shared::util::now_millis;

#[derive(Clone)]
pub struct ChatStore {
    states: Arc<DashMap<String, ConversationState>>,
    ttl: Duration,
}

impl ChatStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            states: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Stored state, or a fresh default that is not inserted
    pub fn get(&self, chat_id: &str) -> ConversationState {
        self.states
            .get(chat_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| ConversationState::new(now_millis()))
    }

    /// Replace the stored state wholesale and refresh `last_update`
    pub fn set(&self, chat_id: &str, step: ChatStep, data: BookingDraft) -> ConversationState {
        let state = ConversationState {
            step,
            data,
            last_update: now_millis(),
        };
        self.states.insert(chat_id.to_string(), state.clone());
        state
    }

    /// Idempotent
    pub fn clear(&self, chat_id: &str) -> bool {
        self.states.remove(chat_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drop entries idle longer than the TTL; returns how many were removed
    pub fn sweep(&self) -> usize {
        self.sweep_at(now_millis())
    }

    pub fn sweep_at(&self, now: i64) -> usize {
        let cutoff = now.saturating_sub(self.ttl.as_millis() as i64);
        let before = self.states.len();
        self.states.retain(|_, state| state.last_update >= cutoff);
        let removed = before.saturating_sub(self.states.len());
        if removed > 0 {
            tracing::debug!(removed, remaining = self.states.len(), "Swept idle chat states");
        }
        removed
    }
}
