pub mod json;
pub mod markdown;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Summary;

pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;

pub const EXPORT_VERSION: u32 = 1;

/// Everything a rendered result artifact may show.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultReport {
    pub export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub user_name: String,
    pub summary: Summary,
}

impl ResultReport {
    pub fn new(user_name: &str, summary: Summary) -> Self {
        Self {
            export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            user_name: user_name.to_string(),
            summary,
        }
    }
}

/// Turns a report into the bytes of a downloadable file.
pub trait ResultRenderer {
    fn extension(&self) -> &'static str;
    fn render(&self, report: &ResultReport) -> Result<Vec<u8>>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn renderer(self) -> Box<dyn ResultRenderer> {
        match self {
            ExportFormat::Json => Box::new(JsonRenderer),
            ExportFormat::Markdown => Box::new(MarkdownRenderer),
        }
    }
}

/// `<name>_result.<ext>`, with anything but letters, digits, `-` and `_`
/// in the name replaced by `_`.
pub fn report_file_name(user_name: &str, extension: &str) -> String {
    let stem: String = user_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.is_empty() { "quiz".to_string() } else { stem };
    format!("{stem}_result.{extension}")
}

/// Render `report` and write it into `dir`, replacing any previous export
/// for the same name. Written through a temp file so a crash never leaves a
/// half-written artifact.
pub fn write_report(
    dir: &Path,
    report: &ResultReport,
    renderer: &dyn ResultRenderer,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let path = dir.join(report_file_name(&report.user_name, renderer.extension()));
    let tmp_path = path.with_extension("tmp");

    let bytes = renderer.render(report)?;
    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;
    file.write_all(&bytes)?;
    file.sync_all()?;
    fs::rename(&tmp_path, &path)
        .with_context(|| format!("failed to move export into {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = report.summary.rows.len(), "results exported");
    Ok(path)
}
