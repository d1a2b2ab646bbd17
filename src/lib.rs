//! persona-relay: a conversational relay with per-user context over a
//! resilient text-generation client.
//!
//! ```text
//! channel (telegram / pty)
//!     └─ CommsState::respond
//!            └─ Orchestrator::get_response ── HistoryStore (per-user turns)
//!                   └─ candidate matrix ── Transport (reqwest)
//! ```

pub mod comms;
pub mod config;
pub mod conversation;
pub mod error;
#[cfg(feature = "channel-axum")]
pub mod health;
pub mod llm;
pub mod logger;
pub mod persona;
pub mod runtime;
