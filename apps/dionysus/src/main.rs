use std::sync::Arc;

use dionysus::{spawn_idle_reaper, BotConfig, GameRegistry};
use tracing::{error, info};

mod telemetry;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    telemetry::init_tracing();

    // Configuration comes from the environment only:
    // DIONYSUS_CARDS_PATH, DIONYSUS_IDLE_TIMEOUT_SECS, DIONYSUS_REAP_INTERVAL_SECS
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(code = %e.code(), error = %e, "Invalid configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    let pools = match config.load_pools() {
        Ok(pools) => pools,
        Err(e) => {
            error!(code = %e.code(), error = %e, "Failed to load card pools");
            return std::process::ExitCode::FAILURE;
        }
    };
    info!(
        questions = pools.questions().len(),
        answers = pools.answers().len(),
        source = config
            .cards_path
            .as_ref()
            .map_or_else(|| "embedded".to_string(), |p| p.display().to_string()),
        "Card pools loaded"
    );

    let registry = Arc::new(GameRegistry::new(Arc::new(pools)));
    let reaper = config
        .idle_timeout
        .map(|timeout| spawn_idle_reaper(Arc::clone(&registry), timeout, config.reap_interval));
    if reaper.is_none() {
        info!("Idle reaping disabled");
    }

    info!("Dionysus game host ready");
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }

    if let Some(handle) = reaper {
        handle.abort();
    }
    info!(active_games = registry.session_count(), "Shutting down");
    std::process::ExitCode::SUCCESS
}
