//! Conversation store: bounded per-user turn history.
//!
//! History lives only in process memory: it is created lazily on a user's
//! first successful exchange and discarded when the process exits.
//! Callers depend on the [`HistoryStore`] trait, never on the backing map.

mod in_memory;
mod store;

pub use in_memory::InMemoryHistory;
pub use store::HistoryStore;

/// Default number of turns kept per user.
pub const DEFAULT_MAX_HISTORY: usize = 10;

/// Who produced a [`Turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One prior message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}
