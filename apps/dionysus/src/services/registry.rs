//! Game registry service: session lookup, single membership, serialized
//! mutation.
//!
//! Each session sits behind its own mutex, so intents for one key apply one
//! at a time while different keys proceed in parallel. Membership
//! (`player -> key`) lives behind a single mutex. Lock order is always
//! membership, then session; nothing takes the membership lock while
//! holding a session lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::Rng;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::domain::player_view::{self, HandView, JudgeView, WinnerView};
use crate::domain::{
    CardPools, EndReason, GameKey, GameSession, GameTransition, JoinOutcome, Outcome, RoundResult,
    ScoreTable, StartedRound, Submission, UserId,
};
use crate::errors::domain::GameError;
use crate::utils::join_code::generate_join_code;

type SharedSession = Arc<Mutex<GameSession>>;

const EVENT_CAPACITY: usize = 256;

/// A transition tagged with the game it happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    pub key: GameKey,
    pub transition: GameTransition,
}

pub struct GameRegistry {
    pools: Arc<CardPools>,
    sessions: DashMap<GameKey, SharedSession>,
    memberships: Mutex<HashMap<UserId, GameKey>>,
    events: broadcast::Sender<GameEvent>,
}

impl GameRegistry {
    pub fn new(pools: Arc<CardPools>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            pools,
            sessions: DashMap::new(),
            memberships: Mutex::new(HashMap::new()),
            events,
        }
    }

    /// Terminations from every path: explicit end, removal, idle reaping,
    /// and deck exhaustion inside an intent that returned an error.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    fn publish(&self, key: &GameKey, transitions: &[GameTransition]) {
        for transition in transitions {
            // No receivers is fine.
            let _ = self.events.send(GameEvent {
                key: key.clone(),
                transition: transition.clone(),
            });
        }
    }

    /// Create an empty lobby under a fresh key.
    pub fn create(&self) -> GameKey {
        self.create_with_seed(rand::rng().random())
    }

    /// Create a lobby whose deck and submission order derive from `seed`.
    pub fn create_with_seed(&self, seed: u64) -> GameKey {
        loop {
            let key = GameKey::parse(&generate_join_code());
            if let Entry::Vacant(slot) = self.sessions.entry(key.clone()) {
                let session = GameSession::new(key.clone(), &self.pools, seed);
                slot.insert(Arc::new(Mutex::new(session)));
                info!(game_key = %key, "Game created");
                return key;
            }
            debug!(game_key = %key, "Join code collision, regenerating");
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn contains(&self, key: &GameKey) -> bool {
        self.sessions.contains_key(key)
    }

    fn session(&self, key: &GameKey) -> Result<SharedSession, GameError> {
        self.sessions
            .get(key)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| GameError::invalid_key(key.as_str()))
    }

    /// Seat `player_id` in the session under `key`.
    ///
    /// Joining the session one already belongs to is a no-op; belonging to
    /// any other live session is an error.
    pub fn join(
        &self,
        key: &GameKey,
        player_id: UserId,
        display_name: &str,
    ) -> Result<Outcome<JoinOutcome>, GameError> {
        let mut memberships = self.memberships.lock();
        let shared = self.session(key)?;
        if let Some(existing) = memberships.get(&player_id) {
            if existing != key {
                return Err(GameError::AlreadyInGame {
                    player_id,
                    key: existing.to_string(),
                });
            }
        }

        let outcome = shared.lock().add_player(player_id, display_name)?;
        memberships.insert(player_id, key.clone());
        if outcome.value == JoinOutcome::Joined {
            info!(game_key = %key, player_id = %player_id, display_name, "Player joined");
        }
        Ok(outcome)
    }

    /// Key of the session `player_id` belongs to.
    pub fn resolve(&self, player_id: UserId) -> Result<GameKey, GameError> {
        self.memberships
            .lock()
            .get(&player_id)
            .cloned()
            .ok_or(GameError::not_in_game(player_id))
    }

    /// Members of the session under `key`, in join order.
    pub fn members_of(&self, key: &GameKey) -> Result<Vec<UserId>, GameError> {
        let shared = self.session(key)?;
        let session = shared.lock();
        Ok(session.players().iter().map(|p| p.id).collect())
    }

    /// Run `f` with exclusive access to the session under `key`.
    ///
    /// A session left terminated by `f` is evicted afterwards, and any
    /// transitions its failed calls caused are published.
    pub fn with_session<T>(
        &self,
        key: &GameKey,
        f: impl FnOnce(&mut GameSession) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let shared = self.session(key)?;
        let (result, terminated, unreported) = {
            let mut session = shared.lock();
            let result = f(&mut session);
            (result, session.is_terminated(), session.take_unreported())
        };
        if terminated {
            self.evict(key, &shared);
        }
        self.publish(key, &unreported);
        result
    }

    /// Run `f` against the session `player_id` belongs to.
    pub fn with_player_session<T>(
        &self,
        player_id: UserId,
        f: impl FnOnce(&mut GameSession) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let key = self.resolve(player_id)?;
        self.with_session(&key, |session| {
            if !session.is_member(player_id) {
                return Err(GameError::not_in_game(player_id));
            }
            f(session)
        })
        .map_err(|e| match e {
            // Removed between lookup and lock.
            GameError::InvalidGameKey { .. } => GameError::not_in_game(player_id),
            other => other,
        })
    }

    /// Drop a terminated session and its memberships, if it is still the
    /// one registered under `key`.
    fn evict(&self, key: &GameKey, shared: &SharedSession) {
        let mut memberships = self.memberships.lock();
        if self
            .sessions
            .remove_if(key, |_, current| Arc::ptr_eq(current, shared))
            .is_some()
        {
            memberships.retain(|_, k| *k != *key);
            info!(game_key = %key, "Game evicted");
        }
    }

    fn remove_with(
        &self,
        key: &GameKey,
        reason: EndReason,
    ) -> Result<Outcome<ScoreTable>, GameError> {
        let mut memberships = self.memberships.lock();
        let (_, shared) = self
            .sessions
            .remove(key)
            .ok_or_else(|| GameError::invalid_key(key.as_str()))?;
        memberships.retain(|_, k| *k != *key);

        let mut session = shared.lock();
        let ended = session.terminate(reason);
        info!(game_key = %key, ?reason, rounds = session.rounds_played(), "Game removed");
        self.publish(key, &ended.transitions);
        Ok(ended.map(|()| player_view::score_table(&session)))
    }

    /// Evict the session under `key` and all memberships pointing at it.
    pub fn remove(&self, key: &GameKey) -> Result<Outcome<()>, GameError> {
        self.remove_with(key, EndReason::Ended).map(|outcome| outcome.map(|_| ()))
    }

    /// End the game explicitly, returning the final standings.
    pub fn end(&self, key: &GameKey) -> Result<Outcome<ScoreTable>, GameError> {
        self.remove_with(key, EndReason::Ended)
    }

    /// Remove every session idle for longer than `max_idle`. Returns the
    /// removed keys with their termination transitions.
    pub fn reap_idle(&self, max_idle: Duration) -> Vec<Outcome<GameKey>> {
        let candidates: Vec<(GameKey, SharedSession)> = self
            .sessions
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        let mut reaped = Vec::new();
        for (key, shared) in candidates {
            let mut memberships = self.memberships.lock();
            let mut session = shared.lock();
            if session.idle_for(Instant::now()) <= max_idle {
                continue;
            }
            if self
                .sessions
                .remove_if(&key, |_, current| Arc::ptr_eq(current, &shared))
                .is_none()
            {
                continue;
            }
            memberships.retain(|_, k| *k != key);
            let ended = session.terminate(EndReason::Idle);
            info!(game_key = %key, idle_secs = max_idle.as_secs(), "Idle game reaped");
            self.publish(&key, &ended.transitions);
            reaped.push(ended.map(|()| key));
        }
        reaped
    }

    /// Start the next round in the caller's session. The caller must be a
    /// member.
    pub fn start_round(&self, player_id: UserId) -> Result<Outcome<StartedRound>, GameError> {
        self.with_player_session(player_id, |session| {
            let outcome = session.start_round()?;
            info!(
                game_key = %session.key(),
                started_by = %player_id,
                round_no = outcome.value.round_no,
                judge_id = %outcome.value.judge_id,
                "Round started"
            );
            Ok(outcome)
        })
    }

    /// Submit cards by 1-based hand positions.
    pub fn submit_answer(
        &self,
        player_id: UserId,
        ordinals: &[usize],
    ) -> Result<Outcome<Submission>, GameError> {
        self.with_player_session(player_id, |session| {
            let outcome = session.submit_ordinals(player_id, ordinals)?;
            debug!(
                game_key = %session.key(),
                player_id = %player_id,
                remaining = outcome.value.remaining,
                "Answer submitted"
            );
            Ok(outcome)
        })
    }

    /// Judge picks the submission shown at 1-based `ordinal`.
    pub fn choose_winner(
        &self,
        player_id: UserId,
        ordinal: usize,
    ) -> Result<Outcome<RoundResult>, GameError> {
        self.with_player_session(player_id, |session| {
            let outcome = session.choose_winner(player_id, ordinal)?;
            info!(
                game_key = %session.key(),
                round_no = outcome.value.round_no,
                winner_id = %outcome.value.winner_id,
                "Round won"
            );
            Ok(outcome)
        })
    }

    pub fn hand_view(&self, player_id: UserId) -> Result<HandView, GameError> {
        self.with_player_session(player_id, |session| player_view::hand_view(session, player_id))
    }

    pub fn judge_view(&self, key: &GameKey) -> Result<JudgeView, GameError> {
        self.with_session(key, |session| player_view::judge_view(session))
    }

    pub fn winner_view(&self, key: &GameKey) -> Result<WinnerView, GameError> {
        self.with_session(key, |session| player_view::winner_view(session))
    }

    pub fn score_table(&self, key: &GameKey) -> Result<ScoreTable, GameError> {
        self.with_session(key, |session| Ok(player_view::score_table(session)))
    }
}
