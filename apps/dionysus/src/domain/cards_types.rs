//! Core card types: QuestionCard, AnswerCard, CardKind

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::errors::domain::GameError;

/// Which pool a card is drawn from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub enum CardKind {
    Question,
    Answer,
}

/// Identity of a card within its pool. Two cards are the same card iff their
/// ids match, regardless of text.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct CardId(pub u32);

/// An answer card: opaque text with a pool-unique identity.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerCard {
    pub id: CardId,
    pub text: Arc<str>,
}

impl AnswerCard {
    pub fn new(id: u32, text: impl Into<Arc<str>>) -> Self {
        Self {
            id: CardId(id),
            text: text.into(),
        }
    }
}

impl PartialEq for AnswerCard {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AnswerCard {}

impl std::hash::Hash for AnswerCard {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for AnswerCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A question card: template text with `pick` blanks.
///
/// A blank is any run of one or more `_` characters. Questions may carry
/// fewer blanks than `pick` (typically questions ending in `?`); answers
/// without a blank to fill are appended after the text.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionCard {
    pub id: CardId,
    pub text: Arc<str>,
    pub pick: u8,
}

impl QuestionCard {
    pub fn new(id: u32, text: impl Into<Arc<str>>, pick: u8) -> Self {
        Self {
            id: CardId(id),
            text: text.into(),
            pick,
        }
    }

    pub fn pick(&self) -> usize {
        self.pick as usize
    }

    /// Substitute `answers` into the blanks in positional order.
    pub fn fill_in(&self, answers: &[AnswerCard]) -> Result<String, GameError> {
        if answers.len() != self.pick() {
            return Err(GameError::WrongSubmissionCount {
                expected: self.pick(),
                actual: answers.len(),
            });
        }

        let mut out = String::with_capacity(self.text.len() + answers.len() * 16);
        let mut pending = answers.iter();
        let mut in_blank = false;
        for ch in self.text.chars() {
            if ch == '_' {
                if !in_blank {
                    in_blank = true;
                    match pending.next() {
                        Some(answer) => out.push_str(&answer.text),
                        // More blanks than answers: leave the blank visible.
                        None => out.push('_'),
                    }
                }
                continue;
            }
            in_blank = false;
            out.push(ch);
        }

        for answer in pending {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            out.push_str(&answer.text);
        }
        Ok(out)
    }
}

impl PartialEq for QuestionCard {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for QuestionCard {}

impl fmt::Display for QuestionCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
