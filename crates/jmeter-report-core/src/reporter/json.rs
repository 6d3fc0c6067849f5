//! JSON reporter for analysis summaries

use crate::analysis::AnalysisSummary;
use anyhow::Result;

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Format a summary as JSON
    ///
    /// # Arguments
    ///
    /// * `summary` - The analysis summary to format
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn format(summary: &AnalysisSummary, pretty: bool) -> Result<String> {
        let output = if pretty {
            serde_json::to_string_pretty(summary)?
        } else {
            serde_json::to_string(summary)?
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::fixtures;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_format_compact() {
        let output = JsonReporter::format(&fixtures::summary(), false).unwrap();

        // Compact JSON should not have newlines
        assert!(!output.contains('\n'));
        assert!(output.contains("\"peak_throughput\":2"));
    }

    #[test]
    fn test_json_format_pretty() {
        let output = JsonReporter::format(&fixtures::summary(), true).unwrap();

        assert!(output.contains('\n'));
        assert!(output.contains("  "));
    }

    #[test]
    fn test_warnings_keyed_by_field_name() {
        let summary = fixtures::summary_with(
            "timeStamp,elapsed,success,responseCode\n0,abc,true,200\n",
            &Default::default(),
        );
        let value: serde_json::Value =
            serde_json::from_str(&JsonReporter::format(&summary, false).unwrap()).unwrap();

        assert_eq!(value["warnings_by_field"]["elapsed"], 1);
        assert_eq!(value["warnings_by_field"]["timestamp"], 0);
    }

    #[test]
    fn test_json_roundtrip() {
        let summary = fixtures::summary();
        let json = JsonReporter::format(&summary, false).unwrap();
        let parsed: AnalysisSummary = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.stats.total_requests, summary.stats.total_requests);
        assert_eq!(parsed.response_codes, summary.response_codes);
        assert_eq!(parsed.warnings_by_field, summary.warnings_by_field);
        assert_eq!(parsed.thresholds, summary.thresholds);
    }
}
