//! Host configuration loaded from `DIONYSUS_*` environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::CardPools;
use crate::error::AppError;

pub const CARDS_PATH_VAR: &str = "DIONYSUS_CARDS_PATH";
pub const IDLE_TIMEOUT_VAR: &str = "DIONYSUS_IDLE_TIMEOUT_SECS";
pub const REAP_INTERVAL_VAR: &str = "DIONYSUS_REAP_INTERVAL_SECS";

const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 3600;
const DEFAULT_REAP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Card pool file. The embedded pool is used when unset.
    pub cards_path: Option<PathBuf>,
    /// `None` disables idle reaping.
    pub idle_timeout: Option<Duration>,
    pub reap_interval: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            cards_path: None,
            idle_timeout: Some(Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS)),
            reap_interval: Duration::from_secs(DEFAULT_REAP_INTERVAL_SECS),
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let cards_path = get(CARDS_PATH_VAR).map(PathBuf::from);

        let idle_secs = match get(IDLE_TIMEOUT_VAR) {
            Some(raw) => parse_secs(IDLE_TIMEOUT_VAR, &raw)?,
            None => DEFAULT_IDLE_TIMEOUT_SECS,
        };
        let idle_timeout = (idle_secs > 0).then(|| Duration::from_secs(idle_secs));

        let interval_secs = match get(REAP_INTERVAL_VAR) {
            Some(raw) => parse_secs(REAP_INTERVAL_VAR, &raw)?,
            None => DEFAULT_REAP_INTERVAL_SECS,
        };
        if interval_secs == 0 {
            return Err(AppError::config(format!(
                "{REAP_INTERVAL_VAR} must be greater than zero"
            )));
        }

        Ok(Self {
            cards_path,
            idle_timeout,
            reap_interval: Duration::from_secs(interval_secs),
        })
    }

    /// Card pools from `cards_path`, or the embedded default.
    pub fn load_pools(&self) -> Result<CardPools, AppError> {
        match &self.cards_path {
            Some(path) => CardPools::from_path(path),
            None => CardPools::embedded(),
        }
    }
}

fn parse_secs(var: &str, raw: &str) -> Result<u64, AppError> {
    raw.parse::<u64>()
        .map_err(|_| AppError::config(format!("{var} must be a whole number of seconds, got {raw:?}")))
}
