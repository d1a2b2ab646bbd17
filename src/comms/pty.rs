//! PTY (console) channel: reads lines from stdin and prints replies.
//!
//! Handy for trying a persona locally without a Telegram bot. The whole
//! console session is a single user, [`PTY_USER_ID`].

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::runtime::{Component, ComponentFuture};

use super::state::CommsState;

/// History key used for the console user.
pub const PTY_USER_ID: i64 = 0;

pub struct PtyChannel {
    channel_id: String,
    state: Arc<CommsState>,
}

impl PtyChannel {
    pub fn new(channel_id: impl Into<String>, state: Arc<CommsState>) -> Self {
        Self { channel_id: channel_id.into(), state }
    }
}

impl Component for PtyChannel {
    fn id(&self) -> &str {
        &self.channel_id
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_pty(self.channel_id, self.state, shutdown))
    }
}

async fn run_pty(channel_id: String, state: Arc<CommsState>, shutdown: CancellationToken) -> Result<(), AppError> {
    info!(%channel_id, "pty channel started, type a message and press Enter. Ctrl-C to quit.");
    println!("─────────────────────────────────");
    println!(" persona-relay console  (Ctrl-C to quit, /reset to forget)");
    println!("─────────────────────────────────");

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        print!("> ");
        use std::io::Write as _;
        let _ = std::io::stdout().flush();

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                println!();
                info!(%channel_id, "pty channel shutting down");
                break;
            }

            line = lines.next_line() => {
                match line {
                    Err(e) => {
                        warn!(%channel_id, "pty read error: {e}");
                        break;
                    }
                    Ok(None) => {
                        info!(%channel_id, "pty stdin closed");
                        break;
                    }
                    Ok(Some(input)) => {
                        debug!(%channel_id, input_len = input.len(), "pty received line");
                        if let Some(reply) = state.respond(PTY_USER_ID, &input).await {
                            println!("{reply}");
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
