use anyhow::Result;

use crate::export::{ResultRenderer, ResultReport};

pub struct JsonRenderer;

impl ResultRenderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &ResultReport) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(report)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_report;

    #[test]
    fn test_json_has_rows_and_accuracy() {
        let bytes = JsonRenderer.render(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["summary"]["total"], 2);
        assert_eq!(value["summary"]["accuracy"], 0.5);
        assert_eq!(value["summary"]["tier"], "good");
        assert_eq!(value["summary"]["rows"][1]["submitted"], "사다");
    }
}
