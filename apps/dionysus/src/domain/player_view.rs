//! Read-only views of a session for the presentation layer.
//!
//! Views never expose more than their audience may see: the judge view
//! never says who submitted what, and a hand view shows only one player's cards.

use serde::Serialize;

use crate::domain::player::UserId;
use crate::domain::scoring::{rank_players, ScoreTable};
use crate::domain::session::{GameSession, SessionState};
use crate::errors::domain::GameError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedCard {
    /// 1-based position, as players type it.
    pub ordinal: usize,
    pub text: String,
}

/// One player's hand for the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandView {
    pub question_text: Option<String>,
    pub pick: Option<usize>,
    pub cards: Vec<NumberedCard>,
}

/// What the judge sees: filled-in submissions in anonymized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JudgeView {
    pub judge_id: UserId,
    pub question_text: String,
    pub entries: Vec<NumberedCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributedEntry {
    pub player_id: UserId,
    pub name: String,
    pub text: String,
}

/// Round result with authorship revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerView {
    pub winner: AttributedEntry,
    /// Every other submission, sorted by display name.
    pub others: Vec<AttributedEntry>,
}

pub fn hand_view(session: &GameSession, player_id: UserId) -> Result<HandView, GameError> {
    let player = session
        .player(player_id)
        .ok_or(GameError::not_in_game(player_id))?;
    let question = session.current_question();
    Ok(HandView {
        question_text: question.map(|q| q.text.to_string()),
        pick: question.map(|q| q.pick()),
        cards: player
            .hand()
            .iter()
            .enumerate()
            .map(|(i, card)| NumberedCard {
                ordinal: i + 1,
                text: card.text.to_string(),
            })
            .collect(),
    })
}

/// Available once every submission is in.
pub fn judge_view(session: &GameSession) -> Result<JudgeView, GameError> {
    if session.state() != SessionState::WaitingForJudge {
        return Err(GameError::WrongPhase {
            actual: session.state(),
        });
    }
    let round = session.round().ok_or(GameError::WrongPhase {
        actual: session.state(),
    })?;
    let entries = round
        .anonymized()
        .map(|(ordinal, answers)| {
            round
                .question
                .fill_in(answers)
                .map(|text| NumberedCard { ordinal, text })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(JudgeView {
        judge_id: round.judge_id,
        question_text: round.question.text.to_string(),
        entries,
    })
}

/// Available once the judge has chosen.
pub fn winner_view(session: &GameSession) -> Result<WinnerView, GameError> {
    let (Some(round), Some(winner_id)) = (session.round(), session.winner_id()) else {
        return Err(GameError::WrongPhase {
            actual: session.state(),
        });
    };

    let mut entries = round
        .submission_order()
        .iter()
        .filter_map(|id| {
            let player = session.player(*id)?;
            let answers = round.submission_of(*id)?;
            Some(round.question.fill_in(answers).map(|text| AttributedEntry {
                player_id: *id,
                name: player.display_name.clone(),
                text,
            }))
        })
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let pos = entries
        .iter()
        .position(|e| e.player_id == winner_id)
        .ok_or(GameError::not_in_game(winner_id))?;
    let winner = entries.remove(pos);
    Ok(WinnerView {
        winner,
        others: entries,
    })
}

pub fn score_table(session: &GameSession) -> ScoreTable {
    rank_players(session.players(), session.rounds_played())
}
