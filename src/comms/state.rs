//! Shared state for the comms channels: the only path from a channel to the
//! orchestrator.
//!
//! Channels receive an `Arc<CommsState>` and call [`CommsState::respond`];
//! they never see a [`CallResult`] or any provider error.

use std::sync::Arc;

use tracing::debug;

use crate::llm::{HttpTransport, Orchestrator, Transport};

use super::reply::{self, Command, Inbound};

pub struct CommsState<T = HttpTransport> {
    bot_name: String,
    orchestrator: Arc<Orchestrator<T>>,
}

impl<T: Transport> CommsState<T> {
    pub fn new(bot_name: impl Into<String>, orchestrator: Arc<Orchestrator<T>>) -> Self {
        Self { bot_name: bot_name.into(), orchestrator }
    }

    /// `true` if `text` will go to the model (channels show a typing hint).
    pub fn is_chat(&self, text: &str) -> bool {
        matches!(reply::parse(text), Inbound::Chat(_))
    }

    /// Reply text for `text` from `user_id`, or `None` when nothing should
    /// be sent back (blank input).
    pub async fn respond(&self, user_id: i64, text: &str) -> Option<String> {
        match reply::parse(text) {
            Inbound::Empty => None,
            Inbound::Command(Command::Start) => Some(reply::greeting(&self.bot_name)),
            Inbound::Command(Command::Help) => Some(reply::help_text()),
            Inbound::Command(Command::Reset) => {
                debug!(user_id, "history reset requested");
                self.orchestrator.clear_history(user_id);
                Some(reply::RESET_MESSAGE.to_string())
            }
            Inbound::Chat(message) => {
                let result = self.orchestrator.get_response(user_id, message).await;
                Some(reply::reply_text(result.as_ref()))
            }
        }
    }
}
