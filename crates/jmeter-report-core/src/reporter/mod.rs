//! Analysis summary reporting
//!
//! Formats an [`AnalysisSummary`] for the terminal or for machine consumption,
//! alongside the HTML document.
//!
//! # Output Formats
//!
//! - **JSON**: Machine-readable format for CI/CD integration
//! - **Console**: Human-readable tables and status indicators
//!
//! # Example
//!
//! ```no_run
//! use report_core::reporter::{OutputFormat, Reporter};
//! use report_core::AnalysisSummary;
//!
//! # fn example(summary: AnalysisSummary) -> anyhow::Result<()> {
//! let reporter = Reporter::new(OutputFormat::Console);
//! reporter.report(&summary)?;
//!
//! // Or write to a file
//! Reporter::new(OutputFormat::Json).write_to_file(&summary, "summary.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;

use anyhow::Result;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::analysis::AnalysisSummary;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

/// Output format for analysis summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Console output with tables
    #[default]
    Console,
}

/// Reporter for analysis summaries
#[derive(Debug, Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report the summary to stdout
    pub fn report(&self, summary: &AnalysisSummary) -> Result<()> {
        let output = self.format_results(summary)?;
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", output)?;
        if self.format != OutputFormat::Console {
            writeln!(stdout)?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Write the summary to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, summary: &AnalysisSummary, path: P) -> Result<()> {
        let output = self.format_results(summary)?;
        fs::write(path, output)?;
        Ok(())
    }

    /// Format the summary as a string
    pub fn format_results(&self, summary: &AnalysisSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(summary, false),
            OutputFormat::JsonPretty => JsonReporter::format(summary, true),
            OutputFormat::Console => ConsoleReporter::format(summary),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::analysis::{Analysis, AnalysisSummary};
    use crate::config::Config;
    use crate::ingest::Ingestor;
    use std::path::Path;

    pub fn summary_with(csv: &str, config: &Config) -> AnalysisSummary {
        let table = Ingestor::default()
            .read_from(csv.as_bytes(), Path::new("inline.csv"))
            .unwrap();
        Analysis::from_table(&table, config).unwrap().summary()
    }

    pub fn summary() -> AnalysisSummary {
        summary_with(
            "timeStamp,elapsed,success,responseCode\n\
             0,100,true,200\n\
             500,200,false,500\n\
             1200,300,true,200\n",
            &Config::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reporter_json_format() {
        let reporter = Reporter::new(OutputFormat::Json);
        let output = reporter.format_results(&fixtures::summary()).unwrap();

        assert!(output.contains("\"total_requests\":3"));
    }

    #[test]
    fn test_reporter_console_format() {
        let reporter = Reporter::new(OutputFormat::Console);
        let output = reporter.format_results(&fixtures::summary()).unwrap();

        assert!(output.contains("Total Requests"));
        assert!(output.contains("66.67 %"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        Reporter::new(OutputFormat::JsonPretty)
            .write_to_file(&fixtures::summary(), &path)
            .unwrap();

        let parsed: AnalysisSummary =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.stats.total_requests, 3);
    }

    #[test]
    fn test_default_format() {
        let reporter = Reporter::default();
        assert_eq!(reporter.format, OutputFormat::Console);
    }
}
