//! Background task that evicts idle games.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::services::registry::GameRegistry;

/// Every `interval`, remove sessions idle for longer than `idle_timeout`.
///
/// The task runs until aborted. Missed ticks are skipped rather than
/// replayed in a burst.
pub fn spawn_idle_reaper(
    registry: Arc<GameRegistry>,
    idle_timeout: Duration,
    interval: Duration,
) -> JoinHandle<()> {
    info!(
        idle_timeout_secs = idle_timeout.as_secs(),
        interval_secs = interval.as_secs(),
        "Idle reaper started"
    );
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let reaped = registry.reap_idle(idle_timeout);
            if reaped.is_empty() {
                debug!(active = registry.session_count(), "Reaper pass: nothing idle");
            } else {
                info!(
                    reaped = reaped.len(),
                    active = registry.session_count(),
                    "Reaper pass"
                );
            }
        }
    })
}
