//! In-memory history store: a lock-protected map keyed by user id.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::error::AppError;

use super::store::HistoryStore;
use super::{DEFAULT_MAX_HISTORY, Turn};

/// Ephemeral history for every user, capped at `max_history` turns each.
pub struct InMemoryHistory {
    max_history: usize,
    /// user_id -> turns, oldest first
    data: Mutex<HashMap<i64, Vec<Turn>>>,
}

impl InMemoryHistory {
    pub fn new(max_history: usize) -> Self {
        Self { max_history, data: Mutex::new(HashMap::new()) }
    }

    /// Number of users with stored history.
    pub fn user_count(&self) -> usize {
        self.data.lock().map(|d| d.len()).unwrap_or_else(|e| e.into_inner().len())
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl HistoryStore for InMemoryHistory {
    fn get(&self, user_id: i64) -> Result<Vec<Turn>, AppError> {
        let data = self
            .data
            .lock()
            .map_err(|_| AppError::Memory("history lock poisoned".into()))?;
        Ok(data.get(&user_id).cloned().unwrap_or_default())
    }

    fn append(&self, user_id: i64, user_turn: Turn, assistant_turn: Turn) -> Result<(), AppError> {
        let mut data = self
            .data
            .lock()
            .map_err(|_| AppError::Memory("history lock poisoned".into()))?;
        let turns = data.entry(user_id).or_default();
        turns.push(user_turn);
        turns.push(assistant_turn);

        // FIFO cap: drop oldest.
        let excess = turns.len().saturating_sub(self.max_history);
        if excess > 0 {
            turns.drain(..excess);
        }
        debug!(user_id, turns = turns.len(), evicted = excess, "history appended");
        Ok(())
    }

    fn clear(&self, user_id: i64) {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        if data.remove(&user_id).is_some() {
            debug!(user_id, "history cleared");
        }
    }
}
