//! Error codes for the Dionysus game engine.
//!
//! Every game and process error maps to exactly one code. Add new codes
//! here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! handed to the presentation layer.

use core::fmt;

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lookup and membership
    /// No session with the given key
    InvalidGameKey,
    /// Player has no active session
    PlayerNotInGame,
    /// Player is a member of a different session
    AlreadyInGame,

    // Lifecycle
    /// Joining after the first round started
    GameAlreadyStarted,
    /// Fewer players than the minimum
    NotEnoughPlayers,
    /// Starting a round while one is running
    RoundInProgress,
    /// Operation not valid in the current state
    WrongPhase,
    /// Session was ended or evicted
    GameTerminated,
    /// Card pool ran dry
    DeckExhausted,

    // Turn validation
    /// Caller is not the judge
    NotJudge,
    /// Judge tried to submit
    JudgeCannotSubmit,
    /// Second submission in one round
    AlreadySubmitted,
    /// Submission size differs from the pick count
    WrongSubmissionCount,
    /// Submitted card is not in hand
    AnswerNotInHand,
    /// Ordinal outside the listed choices
    IndexOutOfRange,

    // Process
    /// Configuration or card pool error
    ConfigError,
    /// I/O failure
    IoError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidGameKey => "INVALID_GAME_KEY",
            Self::PlayerNotInGame => "PLAYER_NOT_IN_GAME",
            Self::AlreadyInGame => "ALREADY_IN_GAME",

            Self::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            Self::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            Self::RoundInProgress => "ROUND_IN_PROGRESS",
            Self::WrongPhase => "WRONG_PHASE",
            Self::GameTerminated => "GAME_TERMINATED",
            Self::DeckExhausted => "DECK_EXHAUSTED",

            Self::NotJudge => "NOT_JUDGE",
            Self::JudgeCannotSubmit => "JUDGE_CANNOT_SUBMIT",
            Self::AlreadySubmitted => "ALREADY_SUBMITTED",
            Self::WrongSubmissionCount => "WRONG_SUBMISSION_COUNT",
            Self::AnswerNotInHand => "ANSWER_NOT_IN_HAND",
            Self::IndexOutOfRange => "INDEX_OUT_OF_RANGE",

            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
