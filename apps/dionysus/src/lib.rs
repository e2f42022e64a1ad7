#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod services;
pub mod utils;


// Re-exports for public API
pub use config::BotConfig;
pub use domain::{
    CardPools, EndReason, GameKey, GameSession, GameTransition, JoinOutcome, Outcome, ScoreTable,
    SessionState, UserId,
};
pub use error::{AppError, ErrorReport};
pub use errors::{ErrorCode, GameError};
pub use services::{spawn_idle_reaper, GameEvent, GameRegistry};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
