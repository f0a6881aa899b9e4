use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quiz::CHOICE_COUNT;
use crate::quiz::level::{Field, Level, PromptKind};
use crate::quiz::vocabulary::{VocabEntry, Vocabulary, VocabularyError};

/// How source entries are drawn for a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
    /// Each entry at most once per batch. Batches never exceed the vocabulary size.
    #[default]
    WithoutReplacement,
    /// Independent uniform draws; entries may repeat.
    WithReplacement,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub kind: PromptKind,
    pub entry: VocabEntry,
    pub prompt: String,
    pub correct_answer: String,
    pub choices: Vec<String>,
}

impl Question {
    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.correct_answer
    }

    /// Same question with its choices in a new random order.
    pub fn with_shuffled_choices<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.choices.shuffle(rng);
        self
    }
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
    #[error(
        "level {level} has no usable prompt kind: its answer fields need at least {needed} distinct values"
    )]
    LevelUnavailable { level: Level, needed: usize },
}

/// Builds multiple-choice batches from a validated vocabulary.
///
/// Distractors never include an answer that is also correct for the prompt:
/// when several entries share a prompt value (帰る and 変える both read
/// かえる), all of their answers are left out of the pool. A prompt kind is
/// usable only when every entry still has [`CHOICE_COUNT`]` - 1` distractors
/// after that exclusion. Unusable kinds are dropped from their level; a level
/// left with no kinds fails construction, so every level is known to be
/// playable once a generator exists.
#[derive(Clone, Debug)]
pub struct QuestionGenerator {
    vocabulary: Vocabulary,
    sampling: SamplingPolicy,
    batch_size: Option<usize>,
    usable: Vec<PromptKind>,
}

impl QuestionGenerator {
    pub fn new(vocabulary: Vocabulary, sampling: SamplingPolicy) -> Result<Self, GeneratorError> {
        for field in Field::ALL {
            let dups = vocabulary.duplicated_values(field);
            if !dups.is_empty() {
                tracing::warn!(%field, ?dups, "vocabulary has repeated values; they never appear as distractors for each other");
            }
        }

        let usable: Vec<PromptKind> = PromptKind::ALL
            .into_iter()
            .filter(|&kind| {
                vocabulary
                    .entries()
                    .iter()
                    .all(|entry| distractor_pool(&vocabulary, entry, kind).len() >= CHOICE_COUNT - 1)
            })
            .collect();

        let generator = Self {
            vocabulary,
            sampling,
            batch_size: None,
            usable,
        };

        for level in Level::ALL {
            let kinds = generator.kinds_for(level);
            if kinds.is_empty() {
                return Err(GeneratorError::LevelUnavailable {
                    level,
                    needed: CHOICE_COUNT,
                });
            }
            if kinds.len() < level.prompt_kinds().len() {
                tracing::warn!(
                    %level,
                    kept = ?kinds.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
                    "too few unambiguous distractors for some prompt kinds; falling back to the rest"
                );
            }
        }

        Ok(generator)
    }

    /// Fixed number of questions per level. `None` asks once per vocabulary entry.
    pub fn with_batch_size(mut self, batch_size: Option<usize>) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn sampling(&self) -> SamplingPolicy {
        self.sampling
    }

    pub fn batch_len(&self) -> usize {
        self.batch_size.unwrap_or(self.vocabulary.len())
    }

    /// Prompt kinds of `level` that have enough unambiguous distractors.
    pub fn kinds_for(&self, level: Level) -> Vec<PromptKind> {
        level
            .prompt_kinds()
            .iter()
            .copied()
            .filter(|kind| self.usable.contains(kind))
            .collect()
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        level: Level,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Question>, GeneratorError> {
        let kinds = self.kinds_for(level);
        if kinds.is_empty() {
            return Err(GeneratorError::LevelUnavailable {
                level,
                needed: CHOICE_COUNT,
            });
        }

        let entries = self.draw_entries(count, rng);
        let mut questions = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(&kind) = kinds.choose(rng) {
                questions.push(self.build_question(entry, kind, rng));
            }
        }

        tracing::debug!(%level, requested = count, generated = questions.len(), "generated batch");
        Ok(questions)
    }

    fn draw_entries<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&VocabEntry> {
        let all = self.vocabulary.entries();
        match self.sampling {
            SamplingPolicy::WithoutReplacement => {
                let mut pool: Vec<&VocabEntry> = all.iter().collect();
                pool.shuffle(rng);
                pool.truncate(count);
                pool
            }
            SamplingPolicy::WithReplacement => {
                (0..count).filter_map(|_| all.choose(rng)).collect()
            }
        }
    }

    fn build_question<R: Rng + ?Sized>(
        &self,
        entry: &VocabEntry,
        kind: PromptKind,
        rng: &mut R,
    ) -> Question {
        let correct = entry.field(kind.answer_field());
        let distractors = distractor_pool(&self.vocabulary, entry, kind);

        let mut choices: Vec<String> = distractors
            .choose_multiple(rng, CHOICE_COUNT - 1)
            .map(|value| value.to_string())
            .collect();
        choices.push(correct.to_string());
        choices.shuffle(rng);

        Question {
            kind,
            entry: entry.clone(),
            prompt: entry.field(kind.prompt_field()).to_string(),
            correct_answer: correct.to_string(),
            choices,
        }
    }
}

/// Answer values that are wrong for `entry`'s prompt: every distinct value of
/// the answer field except those of entries sharing the same prompt value.
fn distractor_pool<'v>(vocabulary: &'v Vocabulary, entry: &VocabEntry, kind: PromptKind) -> Vec<&'v str> {
    let prompt = entry.field(kind.prompt_field());
    let also_correct: Vec<&str> = vocabulary
        .entries()
        .iter()
        .filter(|other| other.field(kind.prompt_field()) == prompt)
        .map(|other| other.field(kind.answer_field()))
        .collect();
    vocabulary
        .distinct_values(kind.answer_field())
        .into_iter()
        .filter(|value| !also_correct.contains(value))
        .collect()
}
