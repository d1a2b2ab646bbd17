//! Comms: the chat transports in front of the orchestrator.
//!
//! Each channel implements [`Component`] and captures an `Arc<CommsState>`
//! at construction. [`channels`] builds the configured set; the caller
//! spawns them with [`crate::runtime::spawn_components`].

#[cfg(feature = "channel-pty")]
pub mod pty;
pub mod reply;
mod state;
#[cfg(feature = "channel-telegram")]
pub mod telegram;

pub use state::CommsState;

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::runtime::Component;

/// Build every enabled channel.
#[cfg_attr(not(any(feature = "channel-pty", feature = "channel-telegram")), allow(unused_variables))]
pub fn channels(config: &Config, state: Arc<CommsState>) -> Vec<Box<dyn Component>> {
    let mut components: Vec<Box<dyn Component>> = Vec::new();

    #[cfg(feature = "channel-pty")]
    {
        if config.comms_pty_should_load() {
            info!("loading pty channel");
            components.push(Box::new(pty::PtyChannel::new("pty0", state.clone())));
        }
    }

    #[cfg(feature = "channel-telegram")]
    {
        if config.comms_telegram_should_load() {
            info!("loading telegram channel");
            components.push(Box::new(telegram::TelegramChannel::new("telegram0", state.clone())));
        }
    }

    if components.is_empty() {
        info!("no comms channels configured");
    }
    components
}
