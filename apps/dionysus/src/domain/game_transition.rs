// apps/dionysus/src/domain/game_transition.rs

use serde::Serialize;

use crate::domain::player::UserId;
use crate::domain::session::{EndReason, SessionState};

/// Snapshot of the fields transitions are derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLifecycleView {
    pub state: SessionState,
    pub round_no: u32,
    pub judge_id: Option<UserId>,
    pub winner_id: Option<UserId>,
    pub end_reason: Option<EndReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameTransition {
    /// Explicit: a player joined the lobby
    PlayerJoined { player_id: UserId },

    /// Edge-triggered: a new round began collecting submissions
    RoundStarted { round_no: u32, judge_id: UserId },

    /// Explicit: a submission was accepted
    AnswerSubmitted { player_id: UserId, remaining: usize },

    /// Edge-triggered: every non-judge player has submitted
    JudgingReady { judge_id: UserId },

    /// Edge-triggered: the judge picked a winner
    RoundWon { round_no: u32, winner_id: UserId },

    /// Edge-triggered: the session can no longer be played
    GameTerminated { reason: EndReason },
}

/// Value of a session operation plus the transitions it caused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub transitions: Vec<GameTransition>,
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            transitions: self.transitions,
        }
    }
}

/// Derive edge-triggered transitions from before/after lifecycle state.
pub fn derive_game_transitions(
    before: &GameLifecycleView,
    after: &GameLifecycleView,
) -> Vec<GameTransition> {
    let mut transitions = Vec::new();

    // 1. Round start (anything -> WaitingForSubmissions)
    if before.state != SessionState::WaitingForSubmissions
        && after.state == SessionState::WaitingForSubmissions
    {
        if let Some(judge_id) = after.judge_id {
            transitions.push(GameTransition::RoundStarted {
                round_no: after.round_no + 1,
                judge_id,
            });
        }
    }

    // 2. Judging (WaitingForSubmissions -> WaitingForJudge)
    if before.state == SessionState::WaitingForSubmissions
        && after.state == SessionState::WaitingForJudge
    {
        if let Some(judge_id) = after.judge_id {
            transitions.push(GameTransition::JudgingReady { judge_id });
        }
    }

    // 3. Round won (WaitingForJudge -> RoundComplete)
    if before.state == SessionState::WaitingForJudge && after.state == SessionState::RoundComplete
    {
        if let Some(winner_id) = after.winner_id {
            transitions.push(GameTransition::RoundWon {
                round_no: after.round_no,
                winner_id,
            });
        }
    }

    // 4. Termination (!Terminated -> Terminated)
    if before.state != SessionState::Terminated && after.state == SessionState::Terminated {
        transitions.push(GameTransition::GameTerminated {
            reason: after.end_reason.unwrap_or(EndReason::Ended),
        });
    }

    transitions
}
