//! Telegram channel: receives messages via the Bot API, relays them through
//! [`CommsState`], and replies in the same chat.

use std::env;
use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ChatAction;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::runtime::{Component, ComponentFuture};

use super::reply::{MAX_MESSAGE_LENGTH, chunk_message};
use super::state::CommsState;

pub struct TelegramChannel {
    channel_id: String,
    state: Arc<CommsState>,
}

impl TelegramChannel {
    pub fn new(channel_id: impl Into<String>, state: Arc<CommsState>) -> Self {
        Self { channel_id: channel_id.into(), state }
    }
}

impl Component for TelegramChannel {
    fn id(&self) -> &str {
        &self.channel_id
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_telegram(self.channel_id, self.state, shutdown))
    }
}

async fn run_telegram(
    channel_id: String,
    state: Arc<CommsState>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let token = match env::var("TELEGRAM_BOT_TOKEN") {
        Ok(t) if !t.trim().is_empty() => t,
        _ => {
            warn!(%channel_id, "TELEGRAM_BOT_TOKEN not set, telegram channel exiting");
            return Ok(());
        }
    };

    info!(%channel_id, "telegram channel starting");

    let bot = Bot::new(token);

    let state_clone = state.clone();
    let channel_id_clone = channel_id.clone();

    let handler = Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let state = state_clone.clone();
        let channel_id = channel_id_clone.clone();
        async move {
            if let Some(text) = msg.text() {
                // Private chats key history by user; fall back to the chat id.
                let user_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(msg.chat.id.0);
                debug!(%channel_id, user_id, "telegram received message");

                if state.is_chat(text) {
                    if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
                        debug!(%channel_id, "typing indicator failed: {e}");
                    }
                }

                if let Some(reply) = state.respond(user_id, text).await {
                    for chunk in chunk_message(&reply, MAX_MESSAGE_LENGTH) {
                        if let Err(e) = bot.send_message(msg.chat.id, chunk).await {
                            warn!(%channel_id, "failed to send telegram reply: {e}");
                        }
                    }
                }
            }
            respond(())
        }
    });

    let mut dispatcher = Dispatcher::builder(bot, handler).build();

    tokio::select! {
        biased;

        _ = shutdown.cancelled() => {
            info!(%channel_id, "shutdown signal received, closing telegram channel");
        }
        _ = dispatcher.dispatch() => {
            warn!(%channel_id, "telegram dispatcher exited unexpectedly");
        }
    }

    Ok(())
}
