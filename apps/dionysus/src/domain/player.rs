use std::fmt;

use serde::Serialize;

use crate::domain::AnswerCard;
use crate::errors::domain::GameError;

/// Chat-platform user id. Only a weak reference to the participant; all
/// in-game state lives in the owning session.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-participant record owned by a session.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: UserId,
    pub display_name: String,
    hand: Vec<AnswerCard>,
    score: u32,
}

impl Player {
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            hand: Vec::new(),
            score: 0,
        }
    }

    pub fn hand(&self) -> &[AnswerCard] {
        &self.hand
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn award_point(&mut self) {
        self.score += 1;
    }

    pub(crate) fn receive(&mut self, cards: Vec<AnswerCard>) {
        self.hand.extend(cards);
    }

    /// Resolve 1-based hand positions to cards without touching the hand.
    pub fn cards_at(&self, ordinals: &[usize]) -> Result<Vec<AnswerCard>, GameError> {
        ordinals
            .iter()
            .map(|&ordinal| {
                ordinal
                    .checked_sub(1)
                    .and_then(|i| self.hand.get(i))
                    .cloned()
                    .ok_or(GameError::IndexOutOfRange {
                        ordinal,
                        len: self.hand.len(),
                    })
            })
            .collect()
    }

    /// Whether every card is in hand, each card used at most once.
    pub fn holds_all(&self, cards: &[AnswerCard]) -> bool {
        let mut available: Vec<&AnswerCard> = self.hand.iter().collect();
        cards.iter().all(|card| {
            match available.iter().position(|c| *c == card) {
                Some(pos) => {
                    available.swap_remove(pos);
                    true
                }
                None => false,
            }
        })
    }

    /// The hand's own cards matching `cards` by id, in the given order.
    pub(crate) fn held_copies(&self, cards: &[AnswerCard]) -> Vec<AnswerCard> {
        cards
            .iter()
            .filter_map(|card| self.hand.iter().find(|held| held.id == card.id).cloned())
            .collect()
    }

    /// Remove `cards` from hand. Caller must have checked [`Player::holds_all`].
    pub(crate) fn discard(&mut self, cards: &[AnswerCard]) {
        for card in cards {
            if let Some(pos) = self.hand.iter().position(|c| c == card) {
                self.hand.remove(pos);
            }
        }
    }
}
