//! Static card pools and their JSON representation.
//!
//! Pools are loaded once at process start and shared read-only by every
//! session through an `Arc<CardPools>`.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use super::cards_types::{AnswerCard, QuestionCard};
use crate::error::AppError;

const DEFAULT_POOL: &str = include_str!("../../cards/default.json");

#[derive(Debug, Deserialize)]
struct PoolFile {
    questions: Vec<QuestionEntry>,
    answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QuestionEntry {
    text: String,
    #[serde(default = "default_pick")]
    pick: u8,
}

fn default_pick() -> u8 {
    1
}

/// Immutable question and answer pools.
#[derive(Debug, Clone)]
pub struct CardPools {
    questions: Arc<[QuestionCard]>,
    answers: Arc<[AnswerCard]>,
}

impl CardPools {
    /// Build pools from already-constructed cards, validating their content.
    pub fn new(questions: Vec<QuestionCard>, answers: Vec<AnswerCard>) -> Result<Self, AppError> {
        if questions.is_empty() {
            return Err(AppError::config("card pool has no questions"));
        }
        if answers.is_empty() {
            return Err(AppError::config("card pool has no answers"));
        }
        for q in &questions {
            if q.text.trim().is_empty() {
                return Err(AppError::config(format!("question {} is empty", q.id.0)));
            }
            if q.pick == 0 {
                return Err(AppError::config(format!(
                    "question {} has pick 0: {}",
                    q.id.0, q.text
                )));
            }
            if blank_count(&q.text) > q.pick() {
                return Err(AppError::config(format!(
                    "question {} has more blanks than its pick {}: {}",
                    q.id.0, q.pick, q.text
                )));
            }
        }
        if let Some(a) = answers.iter().find(|a| a.text.trim().is_empty()) {
            return Err(AppError::config(format!("answer {} is empty", a.id.0)));
        }

        Ok(Self {
            questions: questions.into(),
            answers: answers.into(),
        })
    }

    /// Parse a pool from JSON text: `{"questions": [{"text", "pick"}], "answers": [..]}`.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let file: PoolFile = serde_json::from_str(json)?;
        let questions = file
            .questions
            .into_iter()
            .enumerate()
            .map(|(i, q)| QuestionCard::new(i as u32, q.text, q.pick))
            .collect();
        let answers = file
            .answers
            .into_iter()
            .enumerate()
            .map(|(i, a)| AnswerCard::new(i as u32, a))
            .collect();
        Self::new(questions, answers)
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| AppError::io(format!("reading card pool {}", path.display()), e))?;
        Self::from_json(&json)
    }

    /// The pool compiled into the binary.
    pub fn embedded() -> Result<Self, AppError> {
        Self::from_json(DEFAULT_POOL)
    }

    pub fn questions(&self) -> &[QuestionCard] {
        &self.questions
    }

    pub fn answers(&self) -> &[AnswerCard] {
        &self.answers
    }
}

/// Number of blanks (runs of `_`) in a question template.
pub fn blank_count(text: &str) -> usize {
    let mut count = 0;
    let mut in_blank = false;
    for ch in text.chars() {
        if ch == '_' {
            if !in_blank {
                count += 1;
            }
            in_blank = true;
        } else {
            in_blank = false;
        }
    }
    count
}
