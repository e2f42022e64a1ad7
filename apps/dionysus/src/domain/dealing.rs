//! Per-session card deck: shuffled, non-repeating draws from the static pools.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::cards_serde::CardPools;
use crate::domain::{AnswerCard, CardKind, QuestionCard};
use crate::errors::domain::GameError;

/// A session's own draw queues. Built from a shuffled copy of the shared
/// pools, so sessions never interfere. Cards are never recycled.
#[derive(Debug, Clone)]
pub struct CardDeck {
    questions: Vec<QuestionCard>,
    answers: Vec<AnswerCard>,
}

impl CardDeck {
    /// Copy and shuffle both pools using `rng` (Fisher-Yates via `SliceRandom`).
    pub fn shuffled<R: Rng + ?Sized>(pools: &CardPools, rng: &mut R) -> Self {
        let mut questions = pools.questions().to_vec();
        let mut answers = pools.answers().to_vec();
        questions.shuffle(rng);
        answers.shuffle(rng);
        Self { questions, answers }
    }

    pub fn remaining(&self, kind: CardKind) -> usize {
        match kind {
            CardKind::Question => self.questions.len(),
            CardKind::Answer => self.answers.len(),
        }
    }

    /// Draw `count` answers. Fails without removing anything when fewer remain.
    pub fn draw_answers(&mut self, count: usize) -> Result<Vec<AnswerCard>, GameError> {
        draw(&mut self.answers, count, CardKind::Answer)
    }

    pub fn draw_question(&mut self) -> Result<QuestionCard, GameError> {
        let mut drawn = draw(&mut self.questions, 1, CardKind::Question)?;
        drawn.pop().ok_or(GameError::DeckExhausted {
            kind: CardKind::Question,
            wanted: 1,
            remaining: 0,
        })
    }
}

fn draw<T>(supply: &mut Vec<T>, count: usize, kind: CardKind) -> Result<Vec<T>, GameError> {
    if count > supply.len() {
        return Err(GameError::DeckExhausted {
            kind,
            wanted: count,
            remaining: supply.len(),
        });
    }
    let at = supply.len() - count;
    Ok(supply.split_off(at))
}
