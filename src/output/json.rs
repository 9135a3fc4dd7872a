//! JSON output renderer.
//!
//! Outputs the report as-is, with camelCase field names.

use crate::models::DigestReport;
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, report: &DigestReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;

    #[test]
    fn render_json() {
        let output = JsonRenderer.render(&fixtures::report());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["repo"], "acme/widgets");
        assert_eq!(parsed["totalMerged"], 1);
        assert_eq!(parsed["totalCommits"], 2);
        assert_eq!(parsed["devCount"], 2);
        let alice = &parsed["devDigests"][0];
        assert_eq!(alice["prs"][0]["todos"][0]["kind"], "todo");
        assert_eq!(alice["failures"][0]["commitSha"], "a1b2c3d4e5");
    }

    #[test]
    fn round_trips_through_serde() {
        let report = fixtures::report();
        let parsed: DigestReport = serde_json::from_str(&JsonRenderer.render(&report)).unwrap();
        assert_eq!(parsed, report);
    }
}
