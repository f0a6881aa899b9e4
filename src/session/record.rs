use serde::{Deserialize, Serialize};

use crate::quiz::{Level, Question};

/// One answered question of a normal round. Never mutated once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub level: Level,
    pub question: Question,
    pub submitted: String,
    pub is_correct: bool,
}

/// Transient signal for the presentation layer after each answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerFeedback {
    Correct,
    Incorrect { expected: String },
}

impl AnswerFeedback {
    pub fn is_correct(&self) -> bool {
        matches!(self, AnswerFeedback::Correct)
    }
}
