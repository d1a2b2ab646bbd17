//! Inference orchestration.
//!
//! [`Orchestrator`] is the single entry point: it assembles the prompt from
//! the persona and the user's history, walks the model × endpoint-format
//! matrix (see [`candidates`]) through a [`Transport`], and folds every
//! outcome into a [`CallResult`]. Nothing below this module leaks raw HTTP
//! statuses or transport errors to callers.

pub mod candidates;
pub mod extract;
pub mod orchestrator;
pub mod transport;

pub use candidates::{Candidate, EndpointFormat, ResponseShape};
pub use orchestrator::Orchestrator;
pub use transport::{HttpTransport, RawResponse, Transport};

use serde::Serialize;
use thiserror::Error;

use crate::conversation::Turn;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(String),
}

// ── Prompt messages ───────────────────────────────────────────────────────────

/// One entry of the message list sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::from_turn(&Turn::user(content))
    }

    pub fn from_turn(turn: &Turn) -> Self {
        Self { role: turn.role.as_str().to_string(), content: turn.content.clone() }
    }

    pub fn is_system(&self) -> bool {
        self.role == "system"
    }
}

// ── Results ───────────────────────────────────────────────────────────────────

/// Failure categories the caller branches on. [`ErrorType::as_str`] gives
/// the snake_case name used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// Credential or quota rejected by the provider.
    InsufficientBalance,
    /// Provider reachable but returned an error or an unusable body.
    ApiError,
    /// Model warming up, or no candidate reachable at all.
    ProviderUnavailable,
    /// Unexpected internal failure.
    Unknown,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InsufficientBalance => "insufficient_balance",
            ErrorType::ApiError => "api_error",
            ErrorType::ProviderUnavailable => "provider_unavailable",
            ErrorType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one [`Orchestrator::get_response`] call.
///
/// `Success::message` is always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallResult {
    Success { message: String },
    Failure { error: String, error_type: ErrorType },
}

impl CallResult {
    pub fn failure(error_type: ErrorType, error: impl Into<String>) -> Self {
        CallResult::Failure { error: error.into(), error_type }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CallResult::Success { .. })
    }

    pub fn error_type(&self) -> Option<ErrorType> {
        match self {
            CallResult::Success { .. } => None,
            CallResult::Failure { error_type, .. } => Some(*error_type),
        }
    }
}
