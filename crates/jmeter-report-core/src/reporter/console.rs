//! Console reporter for analysis summaries
//!
//! Provides human-readable output with box-drawn tables and status indicators.

use anyhow::Result;
use std::fmt::Write;

use crate::analysis::AnalysisSummary;

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format a summary for console output
    pub fn format(summary: &AnalysisSummary) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════╗")?;
        writeln!(output, "║             JMETER RESULTS SUMMARY           ║")?;
        writeln!(output, "╚══════════════════════════════════════════════╝")?;
        writeln!(output)?;

        Self::format_statistics(&mut output, summary)?;
        Self::format_throughput(&mut output, summary)?;
        Self::format_response_codes(&mut output, summary)?;
        Self::format_warnings(&mut output, summary)?;

        if summary.thresholds.evaluated {
            writeln!(output, "──────────────────────────────────────────────")?;
            let status = if summary.thresholds.passed { "PASSED" } else { "FAILED" };
            let status_symbol = if summary.thresholds.passed { "✓" } else { "✗" };
            writeln!(output, "Thresholds: {} {}", status_symbol, status)?;
            for failure in &summary.thresholds.failures {
                writeln!(output, "  ✗ {}", failure)?;
            }
            writeln!(output)?;
        }

        Ok(output)
    }

    fn format_statistics(output: &mut String, summary: &AnalysisSummary) -> Result<()> {
        writeln!(output, "  ┌───────────────────────────┬──────────────┐")?;
        writeln!(output, "  │ Metric                    │        Value │")?;
        writeln!(output, "  ├───────────────────────────┼──────────────┤")?;
        for entry in summary.stats.entries() {
            writeln!(output, "  │ {:<25} │ {:>12} │", entry.label, entry.display)?;
        }
        writeln!(output, "  └───────────────────────────┴──────────────┘")?;
        if summary.stats.statistics_unavailable {
            writeln!(output, "  Statistics unavailable for this input")?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn format_throughput(output: &mut String, summary: &AnalysisSummary) -> Result<()> {
        writeln!(output, "  Throughput:")?;
        if summary.active_seconds == 0 {
            writeln!(output, "    No samples with a usable timestamp")?;
        } else {
            writeln!(
                output,
                "    {} timed samples over {} active seconds",
                summary.timed_samples, summary.active_seconds
            )?;
            writeln!(
                output,
                "    Peak: {} req/s, Mean: {:.2} req/s",
                summary.peak_throughput, summary.mean_throughput
            )?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn format_response_codes(output: &mut String, summary: &AnalysisSummary) -> Result<()> {
        if summary.response_codes.is_empty() {
            return Ok(());
        }
        let total: u64 = summary.response_codes.values().sum();
        writeln!(output, "  Response Codes:")?;
        for (code, count) in &summary.response_codes {
            let code = if code.is_empty() { "(empty)" } else { code.as_str() };
            writeln!(
                output,
                "    {:<10} {:>8} ({:.1}%)",
                code,
                count,
                *count as f64 / total as f64 * 100.0
            )?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn format_warnings(output: &mut String, summary: &AnalysisSummary) -> Result<()> {
        if summary.warning_count == 0 {
            return Ok(());
        }
        writeln!(
            output,
            "  Data Quality: {} invalid field values",
            summary.warning_count
        )?;
        for (field, count) in &summary.warnings_by_field {
            if *count > 0 {
                writeln!(output, "    {:<14} {}", field.to_string(), count)?;
            }
        }
        writeln!(output)?;
        Ok(())
    }
}
