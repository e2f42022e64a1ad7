//! The game session state machine.
//!
//! A session owns its players, its deck, and the current round. Every
//! operation validates fully before mutating, so a failed call leaves the
//! session exactly as it was (except deck exhaustion, which terminates it).

use std::fmt;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::warn;

use crate::domain::cards_serde::CardPools;
use crate::domain::dealing::CardDeck;
use crate::domain::game_transition::{
    derive_game_transitions, GameLifecycleView, GameTransition, Outcome,
};
use crate::domain::player::{Player, UserId};
use crate::domain::round::Round;
use crate::domain::rules::{can_start, HAND_SIZE, MIN_PLAYERS};
use crate::domain::{AnswerCard, CardKind, QuestionCard};
use crate::errors::domain::GameError;

/// Short token identifying one running session.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
pub struct GameKey(String);

impl GameKey {
    /// Normalize user input: trimmed, upper-cased.
    pub fn parse(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session lifecycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub enum SessionState {
    /// Created, accepting players.
    Lobby,
    /// Round running; non-judge players submit.
    WaitingForSubmissions,
    /// All submissions in; the judge picks.
    WaitingForJudge,
    /// Winner recorded; the next round may start.
    RoundComplete,
    /// Ended, exhausted, or reaped. No further play.
    Terminated,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub enum EndReason {
    /// Ended explicitly by a player or the host.
    Ended,
    /// The deck could not supply a round.
    DeckExhausted,
    /// No activity within the idle timeout.
    Idle,
}

/// Whether a join added a player or found them already seated.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum JoinOutcome {
    Joined,
    AlreadyJoined,
}

/// Returned by [`GameSession::start_round`] for hand delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedRound {
    pub round_no: u32,
    pub judge_id: UserId,
    pub question_text: String,
    pub pick: usize,
    /// Each non-judge player's hand, in join order.
    pub hands: Vec<(UserId, Vec<AnswerCard>)>,
}

/// Returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// The question filled in with the submitted answers.
    pub played: String,
    /// Non-judge players who still have to submit.
    pub remaining: usize,
}

/// Returned when the judge picks a winner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub round_no: u32,
    pub winner_id: UserId,
    pub winner_name: String,
    pub winning_text: String,
    pub winner_score: u32,
}

#[derive(Debug)]
pub struct GameSession {
    key: GameKey,
    state: SessionState,
    /// Join order.
    players: Vec<Player>,
    deck: CardDeck,
    rng: ChaCha8Rng,
    /// Completed rounds.
    rounds_played: u32,
    judge_id: Option<UserId>,
    round: Option<Round>,
    end_reason: Option<EndReason>,
    last_activity: Instant,
    /// Transitions from failed calls that still changed the lifecycle.
    unreported: Vec<GameTransition>,
}

impl GameSession {
    /// Create an empty lobby with its own deck shuffled from `seed`.
    pub fn new(key: GameKey, pools: &CardPools, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let deck = CardDeck::shuffled(pools, &mut rng);
        Self {
            key,
            state: SessionState::Lobby,
            players: Vec::new(),
            deck,
            rng,
            rounds_played: 0,
            judge_id: None,
            round: None,
            end_reason: None,
            last_activity: Instant::now(),
            unreported: Vec::new(),
        }
    }

    pub fn key(&self) -> &GameKey {
        &self.key
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: UserId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn is_member(&self, id: UserId) -> bool {
        self.player(id).is_some()
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn judge_id(&self) -> Option<UserId> {
        self.judge_id
    }

    /// Winner of the current round, once chosen.
    pub fn winner_id(&self) -> Option<UserId> {
        self.round.as_ref().and_then(Round::winner_id)
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn current_question(&self) -> Option<&QuestionCard> {
        self.round.as_ref().map(|r| &r.question)
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn is_terminated(&self) -> bool {
        self.state == SessionState::Terminated
    }

    pub fn cards_remaining(&self, kind: CardKind) -> usize {
        self.deck.remaining(kind)
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn lifecycle(&self) -> GameLifecycleView {
        GameLifecycleView {
            state: self.state,
            round_no: self.rounds_played,
            judge_id: self.judge_id,
            winner_id: self.winner_id(),
            end_reason: self.end_reason,
        }
    }

    fn finish<T>(
        &mut self,
        before: &GameLifecycleView,
        value: T,
        mut transitions: Vec<GameTransition>,
    ) -> Outcome<T> {
        self.touch();
        transitions.extend(derive_game_transitions(before, &self.lifecycle()));
        Outcome { value, transitions }
    }

    fn ensure_live(&self) -> Result<(), GameError> {
        if self.is_terminated() {
            return Err(GameError::GameTerminated);
        }
        Ok(())
    }

    /// Drain transitions caused by calls that returned an error, such as the
    /// termination on deck exhaustion.
    pub fn take_unreported(&mut self) -> Vec<GameTransition> {
        std::mem::take(&mut self.unreported)
    }

    /// Move to Terminated. Idempotent; the first reason sticks.
    pub fn terminate(&mut self, reason: EndReason) -> Outcome<()> {
        let before = self.lifecycle();
        if !self.is_terminated() {
            self.state = SessionState::Terminated;
            self.end_reason = Some(reason);
        }
        self.finish(&before, (), Vec::new())
    }

    fn exhausted(&mut self, err: GameError) -> GameError {
        warn!(game_key = %self.key, error = %err, "Deck exhausted; terminating game");
        let ended = self.terminate(EndReason::DeckExhausted);
        self.unreported.extend(ended.transitions);
        err
    }

    /// Seat a player and deal their initial hand. Lobby only.
    ///
    /// Re-adding a current member is a no-op. A deck that cannot cover the
    /// new hand rejects the join without ending the game.
    pub fn add_player(
        &mut self,
        id: UserId,
        display_name: impl Into<String>,
    ) -> Result<Outcome<JoinOutcome>, GameError> {
        self.ensure_live()?;
        let before = self.lifecycle();
        if self.is_member(id) {
            return Ok(self.finish(&before, JoinOutcome::AlreadyJoined, Vec::new()));
        }
        if self.state != SessionState::Lobby {
            return Err(GameError::GameAlreadyStarted);
        }

        let hand = self.deck.draw_answers(HAND_SIZE)?;
        let mut player = Player::new(id, display_name);
        player.receive(hand);
        self.players.push(player);

        Ok(self.finish(
            &before,
            JoinOutcome::Joined,
            vec![GameTransition::PlayerJoined { player_id: id }],
        ))
    }

    /// Judge for the next round: round-robin over join order, starting with
    /// the first player and moving one seat past the previous judge.
    fn next_judge(&self) -> UserId {
        let idx = self
            .judge_id
            .and_then(|prev| self.players.iter().position(|p| p.id == prev))
            .map_or(0, |i| (i + 1) % self.players.len());
        self.players[idx].id
    }

    /// Begin a round: rotate the judge, draw a question, reset submissions.
    pub fn start_round(&mut self) -> Result<Outcome<StartedRound>, GameError> {
        self.ensure_live()?;
        match self.state {
            SessionState::Lobby | SessionState::RoundComplete => {}
            SessionState::WaitingForSubmissions | SessionState::WaitingForJudge => {
                return Err(GameError::RoundInProgress)
            }
            SessionState::Terminated => return Err(GameError::GameTerminated),
        }
        if !can_start(self.players.len()) {
            return Err(GameError::NotEnoughPlayers {
                required: MIN_PLAYERS,
                actual: self.players.len(),
            });
        }

        let before = self.lifecycle();
        let question = match self.deck.draw_question() {
            Ok(q) => q,
            Err(e) => return Err(self.exhausted(e)),
        };
        let judge_id = self.next_judge();
        self.judge_id = Some(judge_id);
        self.round = Some(Round::new(self.rounds_played + 1, judge_id, question.clone()));
        self.state = SessionState::WaitingForSubmissions;

        let hands = self
            .players
            .iter()
            .filter(|p| p.id != judge_id)
            .map(|p| (p.id, p.hand().to_vec()))
            .collect();
        let started = StartedRound {
            round_no: self.rounds_played + 1,
            judge_id,
            question_text: question.text.to_string(),
            pick: question.pick(),
            hands,
        };
        Ok(self.finish(&before, started, Vec::new()))
    }

    /// Checks shared by both submission entry points; returns the player's index.
    fn submission_slot(&self, player_id: UserId) -> Result<usize, GameError> {
        self.ensure_live()?;
        if self.state != SessionState::WaitingForSubmissions {
            return Err(GameError::WrongPhase { actual: self.state });
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(GameError::not_in_game(player_id))?;
        if self.judge_id == Some(player_id) {
            return Err(GameError::JudgeCannotSubmit);
        }
        let round = self.round.as_ref().ok_or(GameError::WrongPhase {
            actual: self.state,
        })?;
        if round.has_submitted(player_id) {
            return Err(GameError::AlreadySubmitted);
        }
        Ok(idx)
    }

    /// Submit by 1-based positions in the player's current hand.
    pub fn submit_ordinals(
        &mut self,
        player_id: UserId,
        ordinals: &[usize],
    ) -> Result<Outcome<Submission>, GameError> {
        let idx = self.submission_slot(player_id)?;
        let answers = self.players[idx].cards_at(ordinals)?;
        self.submit_answer(player_id, answers)
    }

    /// Submit answer cards for the current question.
    pub fn submit_answer(
        &mut self,
        player_id: UserId,
        answers: Vec<AnswerCard>,
    ) -> Result<Outcome<Submission>, GameError> {
        let idx = self.submission_slot(player_id)?;
        let round = self.round.as_ref().ok_or(GameError::WrongPhase {
            actual: self.state,
        })?;
        let pick = round.question.pick();
        if answers.len() != pick {
            return Err(GameError::WrongSubmissionCount {
                expected: pick,
                actual: answers.len(),
            });
        }
        if !self.players[idx].holds_all(&answers) {
            return Err(GameError::AnswerNotInHand);
        }
        // Only ids come from the caller; text comes from the dealt cards.
        let answers = self.players[idx].held_copies(&answers);
        let played = round.question.fill_in(&answers)?;

        let before = self.lifecycle();
        let refill = match self.deck.draw_answers(answers.len()) {
            Ok(cards) => cards,
            Err(e) => return Err(self.exhausted(e)),
        };
        let player = &mut self.players[idx];
        player.discard(&answers);
        player.receive(refill);
        debug_assert_eq!(player.hand().len(), HAND_SIZE);

        let submitters = self.players.len() - 1;
        let round = self.round.as_mut().ok_or(GameError::WrongPhase {
            actual: self.state,
        })?;
        round.record(player_id, answers, &mut self.rng);
        let remaining = submitters - round.submission_count();
        if remaining == 0 {
            self.state = SessionState::WaitingForJudge;
        }

        Ok(self.finish(
            &before,
            Submission { played, remaining },
            vec![GameTransition::AnswerSubmitted {
                player_id,
                remaining,
            }],
        ))
    }

    /// Judge picks the submission shown at 1-based `ordinal`.
    pub fn choose_winner(
        &mut self,
        caller: UserId,
        ordinal: usize,
    ) -> Result<Outcome<RoundResult>, GameError> {
        self.ensure_live()?;
        if self.state != SessionState::WaitingForJudge {
            return Err(GameError::WrongPhase { actual: self.state });
        }
        if self.judge_id != Some(caller) {
            return Err(GameError::NotJudge);
        }
        let round = self.round.as_ref().ok_or(GameError::WrongPhase {
            actual: self.state,
        })?;
        let winner_id = round.submitter_at(ordinal)?;
        let winning_text = round
            .submission_of(winner_id)
            .map(|answers| round.question.fill_in(answers))
            .transpose()?
            .unwrap_or_default();

        let before = self.lifecycle();
        let winner = self
            .players
            .iter_mut()
            .find(|p| p.id == winner_id)
            .ok_or(GameError::not_in_game(winner_id))?;
        winner.award_point();
        let result = RoundResult {
            round_no: self.rounds_played + 1,
            winner_id,
            winner_name: winner.display_name.clone(),
            winning_text,
            winner_score: winner.score(),
        };
        if let Some(round) = self.round.as_mut() {
            round.set_winner(winner_id);
        }
        self.rounds_played += 1;
        self.state = SessionState::RoundComplete;

        Ok(self.finish(&before, result, Vec::new()))
    }
}
