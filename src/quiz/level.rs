use std::fmt;

use serde::{Deserialize, Serialize};

/// A property of a vocabulary entry that can be shown or asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Kanji (or kana-only) dictionary form, e.g. 食べる.
    Form,
    /// Hiragana reading, e.g. たべる.
    Reading,
    Meaning,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Form, Field::Reading, Field::Meaning];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Form => "form",
            Field::Reading => "reading",
            Field::Meaning => "meaning",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of translation a question tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    MeaningFromReading,
    ReadingFromMeaning,
    ReadingFromForm,
    FormFromReading,
    MeaningFromForm,
    FormFromMeaning,
}

impl PromptKind {
    pub const ALL: [PromptKind; 6] = [
        PromptKind::MeaningFromReading,
        PromptKind::ReadingFromMeaning,
        PromptKind::ReadingFromForm,
        PromptKind::FormFromReading,
        PromptKind::MeaningFromForm,
        PromptKind::FormFromMeaning,
    ];

    pub fn prompt_field(self) -> Field {
        match self {
            PromptKind::MeaningFromReading | PromptKind::FormFromReading => Field::Reading,
            PromptKind::ReadingFromMeaning | PromptKind::FormFromMeaning => Field::Meaning,
            PromptKind::ReadingFromForm | PromptKind::MeaningFromForm => Field::Form,
        }
    }

    pub fn answer_field(self) -> Field {
        match self {
            PromptKind::MeaningFromReading | PromptKind::MeaningFromForm => Field::Meaning,
            PromptKind::ReadingFromMeaning | PromptKind::ReadingFromForm => Field::Reading,
            PromptKind::FormFromReading | PromptKind::FormFromMeaning => Field::Form,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PromptKind::MeaningFromReading => "reading-to-meaning",
            PromptKind::ReadingFromMeaning => "meaning-to-reading",
            PromptKind::ReadingFromForm => "form-to-reading",
            PromptKind::FormFromReading => "reading-to-form",
            PromptKind::MeaningFromForm => "form-to-meaning",
            PromptKind::FormFromMeaning => "meaning-to-form",
        }
    }
}

/// Difficulty tier. Each tier pairs two fields and asks in both directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    pub fn prompt_kinds(self) -> &'static [PromptKind] {
        match self {
            Level::Easy => &[PromptKind::MeaningFromReading, PromptKind::ReadingFromMeaning],
            Level::Medium => &[PromptKind::ReadingFromForm, PromptKind::FormFromReading],
            Level::Hard => &[PromptKind::MeaningFromForm, PromptKind::FormFromMeaning],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
