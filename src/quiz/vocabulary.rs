use std::fs;
use std::path::Path;

use icu_normalizer::ComposingNormalizerBorrowed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quiz::level::Field;

const BUILTIN_VOCABULARY: &str = include_str!("../../assets/vocabulary.json");

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub script_form: String,
    pub reading: String,
    pub meaning: String,
}

impl VocabEntry {
    pub fn new(script_form: &str, reading: &str, meaning: &str) -> Self {
        Self {
            script_form: script_form.to_string(),
            reading: reading.to_string(),
            meaning: meaning.to_string(),
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Form => &self.script_form,
            Field::Reading => &self.reading,
            Field::Meaning => &self.meaning,
        }
    }
}

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("vocabulary has no entries")]
    Empty,
    #[error("vocabulary entry {index} has a blank {field}")]
    BlankField { index: usize, field: Field },
    #[error("failed to parse vocabulary: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read vocabulary file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Immutable word list. Every string is trimmed and NFC-normalized so that
/// precomposed and combining-mark kana compare equal.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    entries: Vec<VocabEntry>,
}

impl Vocabulary {
    /// The verb list compiled into the binary.
    pub fn builtin() -> Result<Self, VocabularyError> {
        Self::from_json(BUILTIN_VOCABULARY)
    }

    pub fn from_json(json: &str) -> Result<Self, VocabularyError> {
        let entries: Vec<VocabEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn from_path(path: &Path) -> Result<Self, VocabularyError> {
        let content = fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn new(entries: Vec<VocabEntry>) -> Result<Self, VocabularyError> {
        if entries.is_empty() {
            return Err(VocabularyError::Empty);
        }

        let nfc = ComposingNormalizerBorrowed::new_nfc();
        let normalize = |s: &str| nfc.normalize(s.trim()).to_string();

        let mut normalized = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let entry = VocabEntry::new(
                &normalize(&entry.script_form),
                &normalize(&entry.reading),
                &normalize(&entry.meaning),
            );
            if let Some(field) = Field::ALL.into_iter().find(|&f| entry.field(f).is_empty()) {
                return Err(VocabularyError::BlankField { index, field });
            }
            normalized.push(entry);
        }

        Ok(Self {
            entries: normalized,
        })
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values of `field` across all entries, first occurrence order, duplicates removed.
    pub fn distinct_values(&self, field: Field) -> Vec<&str> {
        let mut values: Vec<&str> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let value = entry.field(field);
            if !values.contains(&value) {
                values.push(value);
            }
        }
        values
    }

    /// Values of `field` shared by more than one entry.
    pub fn duplicated_values(&self, field: Field) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let mut dups: Vec<&str> = Vec::new();
        for entry in &self.entries {
            let value = entry.field(field);
            if seen.contains(&value) {
                if !dups.contains(&value) {
                    dups.push(value);
                }
            } else {
                seen.push(value);
            }
        }
        dups
    }
}
