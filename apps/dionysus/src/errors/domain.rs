//! Game-level error type returned by every session and registry operation.
//!
//! These errors are presentation-agnostic. The command layer turns them into
//! player-facing messages using [`GameError::code`].

use thiserror::Error;

use crate::domain::CardKind;
use crate::domain::player::UserId;
use crate::domain::session::SessionState;
use crate::errors::error_code::ErrorCode;

/// Central game error type. Every variant is recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no game with key {key}")]
    InvalidGameKey { key: String },
    #[error("player {player_id} is not in a game")]
    PlayerNotInGame { player_id: UserId },
    #[error("player {player_id} is already in game {key}")]
    AlreadyInGame { player_id: UserId, key: String },
    #[error("game has already started")]
    GameAlreadyStarted,
    #[error("need at least {required} players, have {actual}")]
    NotEnoughPlayers { required: usize, actual: usize },
    #[error("only the judge can choose the winner")]
    NotJudge,
    #[error("the judge cannot submit answers")]
    JudgeCannotSubmit,
    #[error("already submitted this round")]
    AlreadySubmitted,
    #[error("expected {expected} answers, got {actual}")]
    WrongSubmissionCount { expected: usize, actual: usize },
    #[error("answer is not in your hand")]
    AnswerNotInHand,
    #[error("choice {ordinal} is out of range 1..={len}")]
    IndexOutOfRange { ordinal: usize, len: usize },
    #[error("{kind:?} cards exhausted: wanted {wanted}, {remaining} left")]
    DeckExhausted {
        kind: CardKind,
        wanted: usize,
        remaining: usize,
    },
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("not allowed while the game is {actual:?}")]
    WrongPhase { actual: SessionState },
    #[error("game has ended")]
    GameTerminated,
}

impl GameError {
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidGameKey { key: key.into() }
    }

    pub fn not_in_game(player_id: UserId) -> Self {
        Self::PlayerNotInGame { player_id }
    }

    /// Stable machine-readable code for the presentation layer.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidGameKey { .. } => ErrorCode::InvalidGameKey,
            Self::PlayerNotInGame { .. } => ErrorCode::PlayerNotInGame,
            Self::AlreadyInGame { .. } => ErrorCode::AlreadyInGame,
            Self::GameAlreadyStarted => ErrorCode::GameAlreadyStarted,
            Self::NotEnoughPlayers { .. } => ErrorCode::NotEnoughPlayers,
            Self::NotJudge => ErrorCode::NotJudge,
            Self::JudgeCannotSubmit => ErrorCode::JudgeCannotSubmit,
            Self::AlreadySubmitted => ErrorCode::AlreadySubmitted,
            Self::WrongSubmissionCount { .. } => ErrorCode::WrongSubmissionCount,
            Self::AnswerNotInHand => ErrorCode::AnswerNotInHand,
            Self::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
            Self::DeckExhausted { .. } => ErrorCode::DeckExhausted,
            Self::RoundInProgress => ErrorCode::RoundInProgress,
            Self::WrongPhase { .. } => ErrorCode::WrongPhase,
            Self::GameTerminated => ErrorCode::GameTerminated,
        }
    }
}
