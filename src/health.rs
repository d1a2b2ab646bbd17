//! Healthcheck listener: a tiny axum server hosting platforms can probe.
//!
//! ```text
//! GET /        → 200 {"status":"ok",...}
//! GET /health  → 200 {"status":"ok",...}
//! ```

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AppError;
use crate::runtime::{Component, ComponentFuture};

/// Router state. Cheap to clone.
#[derive(Clone)]
pub struct HealthState {
    bot_name: Arc<str>,
    inference_enabled: bool,
    started: Instant,
}

impl HealthState {
    pub fn new(bot_name: &str, inference_enabled: bool) -> Self {
        Self { bot_name: Arc::from(bot_name), inference_enabled, started: Instant::now() }
    }
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    bot: String,
    inference_enabled: bool,
    uptime_seconds: u64,
}

pub fn build_router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .with_state(state)
}

async fn health(State(state): State<HealthState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        bot: state.bot_name.to_string(),
        inference_enabled: state.inference_enabled,
        uptime_seconds: state.started.elapsed().as_secs(),
    })
}

pub struct HealthServer {
    bind_addr: String,
    state: HealthState,
}

impl HealthServer {
    pub fn new(bind_addr: impl Into<String>, state: HealthState) -> Self {
        Self { bind_addr: bind_addr.into(), state }
    }
}

impl Component for HealthServer {
    fn id(&self) -> &str {
        "health"
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_health(self.bind_addr, self.state, shutdown))
    }
}

async fn run_health(bind_addr: String, state: HealthState, shutdown: CancellationToken) -> Result<(), AppError> {
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::Comms(format!("health bind failed on {bind_addr}: {e}")))?;

    info!(%bind_addr, "health listener up");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Comms(format!("health server error: {e}")))?;

    info!("health listener shut down");
    Ok(())
}
