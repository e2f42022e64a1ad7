use serde::Serialize;
use thiserror::Error;

use crate::errors::{ErrorCode, GameError};

/// Error payload handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub title: String,
    pub detail: String,
    pub code: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("I/O error: {detail}")]
    Io {
        detail: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Game(#[from] GameError),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Io { .. } => ErrorCode::IoError,
            AppError::Game(e) => e.code(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn io(detail: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            detail: detail.into(),
            source,
        }
    }

    pub fn report(&self) -> ErrorReport {
        let code = self.code().as_str();
        ErrorReport {
            title: humanize_code(code),
            detail: self.to_string(),
            code: code.to_string(),
        }
    }
}

impl GameError {
    pub fn report(&self) -> ErrorReport {
        let code = self.code().as_str();
        ErrorReport {
            title: humanize_code(code),
            detail: self.to_string(),
            code: code.to_string(),
        }
    }
}

fn humanize_code(code: &str) -> String {
    code.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::config(format!("malformed card pool: {e}"))
    }
}
