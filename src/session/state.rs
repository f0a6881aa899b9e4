use std::collections::BTreeSet;

use rand::Rng;
use thiserror::Error;

use crate::quiz::{GeneratorError, Level, Question, QuestionGenerator};
use crate::session::record::{AnswerFeedback, AnswerRecord};

pub const MAX_NAME_CHARS: usize = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    NotStarted,
    LevelSelect,
    /// A normal round or, when `is_retry_round` is set, the retry round.
    InRound,
    LevelComplete,
    FinalResult,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizEvent {
    SubmitName(String),
    SelectLevel(Level),
    Answer(String),
    /// Leave an unfinished level; its records are discarded.
    AbandonLevel,
    ContinueToLevelSelect,
    ShowFinalResult,
    Restart,
}

impl QuizEvent {
    fn name(&self) -> &'static str {
        match self {
            QuizEvent::SubmitName(_) => "submit-name",
            QuizEvent::SelectLevel(_) => "select-level",
            QuizEvent::Answer(_) => "answer",
            QuizEvent::AbandonLevel => "abandon-level",
            QuizEvent::ContinueToLevelSelect => "continue",
            QuizEvent::ShowFinalResult => "show-final-result",
            QuizEvent::Restart => "restart",
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("level {0} is already complete")]
    LevelAlreadyCompleted(Level),
    #[error("{remaining} level(s) left before the final result")]
    LevelsIncomplete { remaining: usize },
    #[error("{event} is not valid in phase {phase:?}")]
    UnexpectedEvent { phase: Phase, event: &'static str },
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub phase: Phase,
    pub user_name: String,
    pub active_level: Option<Level>,
    pub question_batch: Vec<Question>,
    /// Always within `0..=question_batch.len()`.
    pub cursor: usize,
    pub mistakes: Vec<Question>,
    pub all_records: Vec<AnswerRecord>,
    pub is_retry_round: bool,
    pub completed_levels: BTreeSet<Level>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.phase != Phase::InRound {
            return None;
        }
        self.question_batch.get(self.cursor)
    }

    pub fn remaining_levels(&self) -> Vec<Level> {
        Level::ALL
            .into_iter()
            .filter(|level| !self.completed_levels.contains(level))
            .collect()
    }

    pub fn all_levels_complete(&self) -> bool {
        self.remaining_levels().is_empty()
    }
}

/// Result of applying one event.
#[derive(Clone, Debug)]
pub struct Step {
    pub state: SessionState,
    pub feedback: Option<AnswerFeedback>,
}

/// Apply `event` to `state`, returning the next state.
///
/// The input state is never modified; on error the caller keeps it as is.
/// Randomness is only drawn when a level starts or a retry round reshuffles.
pub fn transition<R: Rng + ?Sized>(
    state: &SessionState,
    event: QuizEvent,
    generator: &QuestionGenerator,
    rng: &mut R,
) -> Result<Step, SessionError> {
    let mut next = state.clone();
    let mut feedback = None;

    match (state.phase, event) {
        (_, QuizEvent::Restart) => {
            tracing::info!("session restarted");
            next = SessionState::default();
        }
        (Phase::NotStarted, QuizEvent::SubmitName(name)) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(SessionError::EmptyName);
            }
            if name.chars().count() > MAX_NAME_CHARS {
                return Err(SessionError::NameTooLong {
                    max: MAX_NAME_CHARS,
                });
            }
            next.user_name = name.to_string();
            next.phase = Phase::LevelSelect;
        }
        (Phase::LevelSelect, QuizEvent::SelectLevel(level)) => {
            if state.completed_levels.contains(&level) {
                return Err(SessionError::LevelAlreadyCompleted(level));
            }
            let batch = generator.generate(level, generator.batch_len(), rng)?;
            start_level(&mut next, level, batch, rng);
        }
        (Phase::InRound, QuizEvent::Answer(choice)) => {
            feedback = submit_answer(&mut next, choice, rng);
        }
        (Phase::InRound, QuizEvent::AbandonLevel) => {
            if let Some(level) = next.active_level.take() {
                next.all_records.retain(|record| record.level != level);
                tracing::info!(%level, "level abandoned");
            }
            next.question_batch.clear();
            next.cursor = 0;
            next.mistakes.clear();
            next.is_retry_round = false;
            next.phase = Phase::LevelSelect;
        }
        (Phase::LevelComplete, QuizEvent::ContinueToLevelSelect) => {
            next.phase = Phase::LevelSelect;
        }
        (Phase::LevelSelect | Phase::LevelComplete, QuizEvent::ShowFinalResult) => {
            if !state.all_levels_complete() {
                return Err(SessionError::LevelsIncomplete {
                    remaining: state.remaining_levels().len(),
                });
            }
            next.phase = Phase::FinalResult;
        }
        (phase, event) => {
            return Err(SessionError::UnexpectedEvent {
                phase,
                event: event.name(),
            });
        }
    }

    Ok(Step {
        state: next,
        feedback,
    })
}

fn start_level<R: Rng + ?Sized>(
    state: &mut SessionState,
    level: Level,
    batch: Vec<Question>,
    rng: &mut R,
) {
    tracing::info!(%level, questions = batch.len(), "level started");
    state.active_level = Some(level);
    state.question_batch = batch;
    state.cursor = 0;
    state.mistakes.clear();
    state.is_retry_round = false;
    state.phase = Phase::InRound;
    if state.question_batch.is_empty() {
        finish_round(state, rng);
    }
}

fn submit_answer<R: Rng + ?Sized>(
    state: &mut SessionState,
    choice: String,
    rng: &mut R,
) -> Option<AnswerFeedback> {
    let Some(question) = state.question_batch.get(state.cursor).cloned() else {
        finish_round(state, rng);
        return None;
    };

    let is_correct = question.is_correct(&choice);
    let feedback = if is_correct {
        AnswerFeedback::Correct
    } else {
        AnswerFeedback::Incorrect {
            expected: question.correct_answer.clone(),
        }
    };

    if !state.is_retry_round {
        if !is_correct {
            state.mistakes.push(question.clone());
        }
        if let Some(level) = state.active_level {
            state.all_records.push(AnswerRecord {
                level,
                question,
                submitted: choice,
                is_correct,
            });
        }
    }

    state.cursor += 1;
    if state.cursor >= state.question_batch.len() {
        finish_round(state, rng);
    }
    Some(feedback)
}

/// End-of-round: one retry pass over the mistakes of a normal round, then
/// the level is complete. Questions missed again in the retry are not re-queued.
fn finish_round<R: Rng + ?Sized>(state: &mut SessionState, rng: &mut R) {
    if !state.is_retry_round && !state.mistakes.is_empty() {
        let retry: Vec<Question> = std::mem::take(&mut state.mistakes)
            .into_iter()
            .map(|question| question.with_shuffled_choices(rng))
            .collect();
        tracing::debug!(questions = retry.len(), "retry round started");
        state.question_batch = retry;
        state.cursor = 0;
        state.is_retry_round = true;
        return;
    }

    if let Some(level) = state.active_level {
        state.completed_levels.insert(level);
        tracing::info!(%level, "level complete");
    }
    state.mistakes.clear();
    state.phase = Phase::LevelComplete;
}
