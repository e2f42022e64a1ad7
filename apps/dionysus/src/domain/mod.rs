//! Domain layer: pure game logic types and helpers.

pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod game_transition;
pub mod player;
pub mod player_view;
pub mod round;
pub mod rules;
pub mod scoring;
pub mod session;

#[cfg(test)]
mod tests_props_session;
#[cfg(test)]
mod tests_session;

// Re-exports for ergonomics
pub use cards_serde::CardPools;
pub use cards_types::{AnswerCard, CardId, CardKind, QuestionCard};
pub use dealing::CardDeck;
pub use game_transition::{GameTransition, Outcome};
pub use player::{Player, UserId};
pub use round::Round;
pub use rules::{HAND_SIZE, MIN_PLAYERS};
pub use scoring::{ScoreRow, ScoreTable};
pub use session::{
    EndReason, GameKey, GameSession, JoinOutcome, RoundResult, SessionState, StartedRound,
    Submission,
};
