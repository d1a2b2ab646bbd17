//! Inbound parsing and user-facing reply text.
//!
//! Raw provider errors never reach the user: every [`CallResult`] maps to an
//! in-character message here.

use crate::llm::{CallResult, ErrorType};

/// Telegram allows 4096 characters per message; chunk a little below that.
pub const MAX_MESSAGE_LENGTH: usize = 4000;

pub const SETUP_MESSAGE: &str = "I can't think just yet: my owner hasn't connected me to a language model. \
Set the INFERENCE_API_KEY environment variable and restart me.";

pub const QUOTA_MESSAGE: &str = "My thoughts are out of reach right now. The inference credential or its \
quota needs checking. Please let my owner know.";

pub const RETRY_MESSAGE: &str = "Sorry, my mind wandered off for a moment. Could you say that again?";

pub const RESET_MESSAGE: &str = "Fresh start! I've forgotten our conversation so far.";

/// Slash commands the relay understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound<'a> {
    Command(Command),
    Chat(&'a str),
    Empty,
}

/// Classify an inbound text. `/cmd@botname` is accepted; unrecognised
/// commands are answered with help.
pub fn parse(text: &str) -> Inbound<'_> {
    let text = text.trim();
    if text.is_empty() {
        return Inbound::Empty;
    }
    let Some(rest) = text.strip_prefix('/') else {
        return Inbound::Chat(text);
    };

    let word = rest.split_whitespace().next().unwrap_or("");
    let name = word.split('@').next().unwrap_or("").to_ascii_lowercase();
    match name.as_str() {
        "start" => Inbound::Command(Command::Start),
        "reset" | "clear" => Inbound::Command(Command::Reset),
        _ => Inbound::Command(Command::Help),
    }
}

pub fn greeting(bot_name: &str) -> String {
    format!("Hi, I'm {bot_name}! Just send me a message and we'll chat.\n\n{}", help_text())
}

pub fn help_text() -> String {
    "Commands:\n/start: say hello\n/reset: forget our conversation\n/help: show this message".to_string()
}

/// What the user sees for an orchestrator outcome.
pub fn reply_text(result: Option<&CallResult>) -> String {
    match result {
        None => SETUP_MESSAGE.to_string(),
        Some(CallResult::Success { message }) => message.clone(),
        Some(CallResult::Failure { error_type: ErrorType::InsufficientBalance, .. }) => QUOTA_MESSAGE.to_string(),
        Some(CallResult::Failure { .. }) => RETRY_MESSAGE.to_string(),
    }
}

/// Split `text` into chunks of at most `max` characters.
pub fn chunk_message(text: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(max.max(1)).map(|c| c.iter().collect()).collect()
}
