//! Store trait: the narrow interface the orchestrator sees.

use crate::error::AppError;

use super::Turn;

/// Per-user history backend.
///
/// Implementations must make `append` atomic per user: both turns land and
/// the cap is enforced in one step, so readers never observe a torn history.
pub trait HistoryStore: Send + Sync {
    /// Prior turns for `user_id`, oldest first. Empty for unknown users.
    fn get(&self, user_id: i64) -> Result<Vec<Turn>, AppError>;

    /// Append `user_turn` then `assistant_turn`, evicting the oldest turns
    /// beyond the store's cap.
    fn append(&self, user_id: i64, user_turn: Turn, assistant_turn: Turn) -> Result<(), AppError>;

    /// Forget everything for `user_id`. Unknown users are a no-op.
    fn clear(&self, user_id: i64);
}
