//! One question plus the submissions collected for it.

use std::collections::HashMap;

use rand::Rng;

use crate::domain::player::UserId;
use crate::domain::{AnswerCard, QuestionCard};
use crate::errors::domain::GameError;

/// Per-round container.
///
/// `submissions` is keyed by author; `submission_order` is the anonymized
/// display order shown to the judge. Each submission is inserted at a
/// uniformly random position, so the final order is a uniform permutation
/// that does not reveal who submitted first, and it stays stable for the rest
/// of the round.
#[derive(Debug, Clone)]
pub struct Round {
    pub number: u32,
    pub judge_id: UserId,
    pub question: QuestionCard,
    submissions: HashMap<UserId, Vec<AnswerCard>>,
    submission_order: Vec<UserId>,
    winner_id: Option<UserId>,
}

impl Round {
    pub fn new(number: u32, judge_id: UserId, question: QuestionCard) -> Self {
        Self {
            number,
            judge_id,
            question,
            submissions: HashMap::new(),
            submission_order: Vec::new(),
            winner_id: None,
        }
    }

    pub fn has_submitted(&self, player_id: UserId) -> bool {
        self.submissions.contains_key(&player_id)
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }

    pub fn submission_of(&self, player_id: UserId) -> Option<&[AnswerCard]> {
        self.submissions.get(&player_id).map(Vec::as_slice)
    }

    pub fn submission_order(&self) -> &[UserId] {
        &self.submission_order
    }

    pub fn winner_id(&self) -> Option<UserId> {
        self.winner_id
    }

    pub(crate) fn record<R: Rng + ?Sized>(
        &mut self,
        player_id: UserId,
        answers: Vec<AnswerCard>,
        rng: &mut R,
    ) {
        debug_assert!(!self.has_submitted(player_id));
        let slot = rng.random_range(0..=self.submission_order.len());
        self.submission_order.insert(slot, player_id);
        self.submissions.insert(player_id, answers);
    }

    /// Author of the submission shown at 1-based `ordinal`.
    pub fn submitter_at(&self, ordinal: usize) -> Result<UserId, GameError> {
        ordinal
            .checked_sub(1)
            .and_then(|i| self.submission_order.get(i))
            .copied()
            .ok_or(GameError::IndexOutOfRange {
                ordinal,
                len: self.submission_order.len(),
            })
    }

    pub(crate) fn set_winner(&mut self, player_id: UserId) {
        self.winner_id = Some(player_id);
    }

    /// Submissions in display order, each paired with its 1-based ordinal.
    pub fn anonymized(&self) -> impl Iterator<Item = (usize, &[AnswerCard])> + '_ {
        self.submission_order
            .iter()
            .enumerate()
            .filter_map(|(i, id)| self.submission_of(*id).map(|answers| (i + 1, answers)))
    }
}
