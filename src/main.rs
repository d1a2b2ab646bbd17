//! persona-relay entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at the configured level
//!   4. Load persona, build history store and orchestrator
//!   5. Spawn channels and the health listener
//!   6. Run until Ctrl-C or a component fails

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use persona_relay::comms::{self, CommsState};
use persona_relay::conversation::{HistoryStore, InMemoryHistory};
use persona_relay::error::AppError;
use persona_relay::llm::Orchestrator;
use persona_relay::runtime::{Component, spawn_components};
use persona_relay::{config, logger, persona};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present; the file is optional.
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level, true)?;

    info!(
        bot_name = %config.bot_name,
        model = %config.inference.model,
        fallbacks = config.inference.fallback_models.len(),
        max_history = config.inference.max_history,
        "config loaded"
    );

    let system_prompt = persona::load(config.persona_file.as_deref())?;
    let store: Arc<dyn HistoryStore> = Arc::new(InMemoryHistory::new(config.inference.max_history));
    let orchestrator = Arc::new(Orchestrator::from_config(
        &config.inference,
        config.inference_api_key.clone(),
        system_prompt,
        store,
    )?);

    if !orchestrator.is_enabled() {
        warn!("INFERENCE_API_KEY not set, replies will carry setup instructions");
    }

    let state = Arc::new(CommsState::new(config.bot_name.clone(), orchestrator.clone()));
    let mut components: Vec<Box<dyn Component>> = comms::channels(&config, state);

    #[cfg(feature = "channel-axum")]
    {
        if config.health_should_load() {
            use persona_relay::health::{HealthServer, HealthState};
            let health_state = HealthState::new(&config.bot_name, orchestrator.is_enabled());
            components.push(Box::new(HealthServer::new(config.comms.health.bind.clone(), health_state)));
        }
    }

    let shutdown = CancellationToken::new();
    let handle = spawn_components(components, shutdown.clone());

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!("cannot listen for ctrl-c: {e}");
            }
            info!("shutdown signal received");
            shutdown.cancel();
        }
        _ = shutdown.cancelled() => {}
    }

    handle.join().await?;
    info!("persona-relay stopped");
    Ok(())
}
