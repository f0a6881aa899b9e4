use std::fmt::Write as _;

use anyhow::Result;

use crate::export::{ResultRenderer, ResultReport};

/// Plain Markdown table; readable as text and renders anywhere Markdown does.
pub struct MarkdownRenderer;

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

impl ResultRenderer for MarkdownRenderer {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, report: &ResultReport) -> Result<Vec<u8>> {
        let summary = &report.summary;
        let mut out = String::new();

        writeln!(out, "# Quiz result: {}", cell(&report.user_name))?;
        writeln!(out)?;
        writeln!(
            out,
            "- Exported: {}",
            report.exported_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(
            out,
            "- Score: {}/{} ({:.1}%)",
            summary.correct,
            summary.total,
            summary.accuracy * 100.0
        )?;
        writeln!(out, "- Feedback: {}", cell(&summary.feedback))?;
        for tally in &summary.per_level {
            writeln!(out, "- {}: {}/{}", tally.level, tally.correct, tally.total)?;
        }
        writeln!(out)?;

        writeln!(out, "| # | Level | Question | Answer | Submitted | Result |")?;
        writeln!(out, "|---|-------|----------|--------|-----------|--------|")?;
        for row in &summary.rows {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                row.number,
                row.level,
                cell(&row.prompt),
                cell(&row.correct_answer),
                cell(&row.submitted),
                row.marker()
            )?;
        }

        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_report;

    #[test]
    fn test_markdown_table_lists_each_row() {
        let bytes = MarkdownRenderer.render(&sample_report()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("# Quiz result: Mina\n"));
        assert!(text.contains("- Score: 1/2 (50.0%)"));
        assert!(text.contains("- hard: 1/2"));
        assert!(text.contains("| 1 | hard | 飲む | 마시다 | 마시다 | O |"));
        assert!(text.contains("| 2 | hard | 飲む | 마시다 | 사다 | X |"));
    }

    #[test]
    fn test_pipes_are_escaped() {
        assert_eq!(cell("a|b"), "a\\|b");
        assert_eq!(cell("a\nb"), "a b");
    }
}
