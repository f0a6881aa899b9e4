use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::export::ExportFormat;
use crate::quiz::{QuestionGenerator, SamplingPolicy, Vocabulary};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Questions per level; unset asks once per vocabulary entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_per_level: Option<usize>,
    #[serde(default)]
    pub sampling: SamplingPolicy,
    #[serde(default = "default_correct_flash_ms")]
    pub correct_flash_ms: u64,
    #[serde(default = "default_incorrect_flash_ms")]
    pub incorrect_flash_ms: u64,
    #[serde(default)]
    pub export_format: ExportFormat,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    /// JSON word list replacing the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_path: Option<String>,
}

fn default_theme() -> String {
    "sakura".to_string()
}
fn default_language() -> String {
    "en".to_string()
}
fn default_correct_flash_ms() -> u64 {
    500
}
fn default_incorrect_flash_ms() -> u64 {
    1000
}
fn default_export_dir() -> String {
    data_dir().join("results").to_string_lossy().to_string()
}

/// Per-user data directory for exports and the log file.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("doushi")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            language: default_language(),
            questions_per_level: None,
            sampling: SamplingPolicy::default(),
            correct_flash_ms: default_correct_flash_ms(),
            incorrect_flash_ms: default_incorrect_flash_ms(),
            export_format: ExportFormat::default(),
            export_dir: default_export_dir(),
            vocabulary_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("invalid config {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("doushi")
            .join("config.toml")
    }

    pub fn flash_duration(&self, correct: bool) -> Duration {
        Duration::from_millis(if correct {
            self.correct_flash_ms
        } else {
            self.incorrect_flash_ms
        })
    }

    /// Reset `language` to the default when no locale file exists for it.
    pub fn normalize_language(&mut self, available: &[&str]) {
        // Accept region-tagged values such as "ko-KR".
        let base = self
            .language
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if available.contains(&base.as_str()) {
            self.language = base;
        } else {
            tracing::warn!(language = %self.language, "unknown language, using default");
            self.language = default_language();
        }
    }

    /// Configured vocabulary (or the built-in one) wrapped in a validated generator.
    pub fn question_generator(&self) -> Result<QuestionGenerator> {
        let vocabulary = match &self.vocabulary_path {
            Some(path) => Vocabulary::from_path(Path::new(path))?,
            None => Vocabulary::builtin()?,
        };
        let generator = QuestionGenerator::new(vocabulary, self.sampling)?
            .with_batch_size(self.questions_per_level);
        Ok(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "sakura");
        assert_eq!(config.language, "en");
        assert_eq!(config.questions_per_level, None);
        assert_eq!(config.sampling, SamplingPolicy::WithoutReplacement);
        assert_eq!(config.correct_flash_ms, 500);
        assert_eq!(config.incorrect_flash_ms, 1000);
        assert_eq!(config.export_format, ExportFormat::Json);
        assert!(config.export_dir.contains("results"));
        assert!(config.vocabulary_path.is_none());
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
language = "ko"
questions_per_level = 15
sampling = "with_replacement"
export_format = "markdown"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.language, "ko");
        assert_eq!(config.questions_per_level, Some(15));
        assert_eq!(config.sampling, SamplingPolicy::WithReplacement);
        assert_eq!(config.export_format, ExportFormat::Markdown);
        assert_eq!(config.theme, "sakura");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.questions_per_level = Some(10);
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.questions_per_level, Some(10));
        assert_eq!(deserialized.export_dir, config.export_dir);
        assert_eq!(deserialized.sampling, config.sampling);
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.theme, "sakura");
    }

    #[test]
    fn test_save_to_then_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.language = "ko".to_string();
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.language, "ko");
    }

    #[test]
    fn test_load_from_invalid_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "questions_per_level = \"many\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_normalize_language() {
        let available = ["en", "ko"];

        let mut config = Config::default();
        config.language = "ko-KR".to_string();
        config.normalize_language(&available);
        assert_eq!(config.language, "ko");

        config.language = "fr".to_string();
        config.normalize_language(&available);
        assert_eq!(config.language, "en");

        config.language = String::new();
        config.normalize_language(&available);
        assert_eq!(config.language, "en");
    }

    #[test]
    fn test_flash_duration_depends_on_correctness() {
        let config = Config::default();
        assert_eq!(config.flash_duration(true), Duration::from_millis(500));
        assert_eq!(config.flash_duration(false), Duration::from_millis(1000));
    }

    #[test]
    fn test_question_generator_uses_batch_size() {
        let mut config = Config::default();
        config.questions_per_level = Some(7);
        let generator = config.question_generator().unwrap();
        assert_eq!(generator.batch_len(), 7);
    }

    #[test]
    fn test_question_generator_rejects_tiny_vocabulary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        fs::write(
            &path,
            r#"[{"script_form":"買う","reading":"かう","meaning":"사다"}]"#,
        )
        .unwrap();
        let mut config = Config::default();
        config.vocabulary_path = Some(path.to_string_lossy().to_string());
        assert!(config.question_generator().is_err());
    }
}
