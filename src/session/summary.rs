use rust_i18n::t;
use serde::{Deserialize, Serialize};

use crate::quiz::Level;
use crate::session::record::AnswerRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    NoData,
    KeepPracticing,
    Good,
    Great,
    Perfect,
}

impl FeedbackTier {
    pub fn from_accuracy(total: usize, accuracy: f64) -> Self {
        if total == 0 {
            FeedbackTier::NoData
        } else if accuracy >= 1.0 {
            FeedbackTier::Perfect
        } else if accuracy >= 0.8 {
            FeedbackTier::Great
        } else if accuracy >= 0.5 {
            FeedbackTier::Good
        } else {
            FeedbackTier::KeepPracticing
        }
    }

    pub fn message(self, locale: &str) -> String {
        match self {
            FeedbackTier::NoData => t!("feedback.no_data", locale = locale),
            FeedbackTier::KeepPracticing => t!("feedback.keep_practicing", locale = locale),
            FeedbackTier::Good => t!("feedback.good", locale = locale),
            FeedbackTier::Great => t!("feedback.great", locale = locale),
            FeedbackTier::Perfect => t!("feedback.perfect", locale = locale),
        }
        .to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// 1-based position in answer order.
    pub number: usize,
    pub level: Level,
    pub prompt: String,
    pub correct_answer: String,
    pub submitted: String,
    pub is_correct: bool,
}

impl ResultRow {
    pub fn marker(&self) -> &'static str {
        if self.is_correct { "O" } else { "X" }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTally {
    pub level: Level,
    pub correct: usize,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub correct: usize,
    pub total: usize,
    /// In `[0, 1]`; `0.0` when nothing was answered.
    pub accuracy: f64,
    pub rows: Vec<ResultRow>,
    pub per_level: Vec<LevelTally>,
    pub tier: FeedbackTier,
    pub feedback: String,
}

/// Summarize in the active UI locale.
pub fn summarize(records: &[AnswerRecord]) -> Summary {
    let locale = rust_i18n::locale();
    summarize_in(records, &locale)
}

pub fn summarize_in(records: &[AnswerRecord], locale: &str) -> Summary {
    let total = records.len();
    let correct = records.iter().filter(|r| r.is_correct).count();
    let accuracy = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, record)| ResultRow {
            number: i + 1,
            level: record.level,
            prompt: record.question.prompt.clone(),
            correct_answer: record.question.correct_answer.clone(),
            submitted: record.submitted.clone(),
            is_correct: record.is_correct,
        })
        .collect();

    let per_level = Level::ALL
        .into_iter()
        .filter_map(|level| {
            let answered: Vec<&AnswerRecord> =
                records.iter().filter(|r| r.level == level).collect();
            if answered.is_empty() {
                return None;
            }
            Some(LevelTally {
                level,
                correct: answered.iter().filter(|r| r.is_correct).count(),
                total: answered.len(),
            })
        })
        .collect();

    let tier = FeedbackTier::from_accuracy(total, accuracy);
    Summary {
        correct,
        total,
        accuracy,
        rows,
        per_level,
        tier,
        feedback: tier.message(locale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{PromptKind, Question, VocabEntry};

    fn record(level: Level, reading: &str, correct: bool) -> AnswerRecord {
        let question = Question {
            kind: PromptKind::ReadingFromForm,
            entry: VocabEntry::new("見る", reading, "보다"),
            prompt: "見る".to_string(),
            correct_answer: reading.to_string(),
            choices: vec![
                reading.to_string(),
                "かう".to_string(),
                "いく".to_string(),
                "のむ".to_string(),
            ],
        };
        AnswerRecord {
            level,
            submitted: if correct { reading.to_string() } else { "かう".to_string() },
            question,
            is_correct: correct,
        }
    }

    #[test]
    fn test_empty_records_are_neutral() {
        let summary = summarize_in(&[], "en");
        assert_eq!(summary.total, 0);
        assert_eq!(summary.accuracy, 0.0);
        assert!(summary.rows.is_empty());
        assert!(summary.per_level.is_empty());
        assert_eq!(summary.tier, FeedbackTier::NoData);
        assert_eq!(summary.feedback, FeedbackTier::NoData.message("en"));
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(FeedbackTier::from_accuracy(10, 1.0), FeedbackTier::Perfect);
        assert_eq!(FeedbackTier::from_accuracy(10, 0.9), FeedbackTier::Great);
        assert_eq!(FeedbackTier::from_accuracy(10, 0.8), FeedbackTier::Great);
        assert_eq!(FeedbackTier::from_accuracy(10, 0.79), FeedbackTier::Good);
        assert_eq!(FeedbackTier::from_accuracy(10, 0.5), FeedbackTier::Good);
        assert_eq!(FeedbackTier::from_accuracy(10, 0.2), FeedbackTier::KeepPracticing);
        assert_eq!(FeedbackTier::from_accuracy(0, 0.0), FeedbackTier::NoData);
    }

    #[test]
    fn test_all_correct_is_perfect() {
        let records: Vec<AnswerRecord> =
            (0..10).map(|_| record(Level::Easy, "みる", true)).collect();
        let summary = summarize_in(&records, "en");
        assert_eq!(summary.accuracy, 1.0);
        assert_eq!(summary.tier, FeedbackTier::Perfect);
        assert_eq!(summary.feedback, FeedbackTier::Perfect.message("en"));
    }

    #[test]
    fn test_rows_keep_answer_order() {
        let records = vec![
            record(Level::Hard, "みる", true),
            record(Level::Easy, "みる", false),
            record(Level::Medium, "みる", true),
        ];
        let summary = summarize_in(&records, "en");
        let levels: Vec<Level> = summary.rows.iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![Level::Hard, Level::Easy, Level::Medium]);
        let numbers: Vec<usize> = summary.rows.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(summary.rows[1].marker(), "X");
        assert_eq!(summary.rows[1].submitted, "かう");
        assert_eq!(summary.rows[0].marker(), "O");
    }

    #[test]
    fn test_per_level_tallies() {
        let records = vec![
            record(Level::Easy, "みる", true),
            record(Level::Easy, "みる", false),
            record(Level::Hard, "みる", true),
        ];
        let summary = summarize_in(&records, "en");
        assert_eq!(
            summary.per_level,
            vec![
                LevelTally {
                    level: Level::Easy,
                    correct: 1,
                    total: 2
                },
                LevelTally {
                    level: Level::Hard,
                    correct: 1,
                    total: 1
                },
            ]
        );
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.tier, FeedbackTier::Good);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let records = vec![
            record(Level::Easy, "みる", true),
            record(Level::Medium, "みる", false),
        ];
        assert_eq!(summarize_in(&records, "ko"), summarize_in(&records, "ko"));
    }

    #[test]
    fn test_feedback_is_localized() {
        assert_ne!(
            FeedbackTier::Perfect.message("en"),
            FeedbackTier::Perfect.message("ko")
        );
    }
}
