//! Report generation for JMeter load-test results
//!
//! This crate turns a JMeter CSV result file into a single self-contained
//! HTML report: summary statistics, a response-time series, per-second
//! throughput and the response-code distribution.
//!
//! # Pipeline
//!
//! - **Ingest**: read the delimited file into raw string records
//! - **Schema**: require the four columns the report is built from
//! - **Coercion**: convert each field independently, recording a warning
//!   instead of dropping the row when a value is malformed
//! - **Statistics**: counts, averages and interpolated percentiles, in seconds
//! - **Throughput**: request counts per one-second bucket
//! - **Render**: minijinja template with inline SVG charts, written atomically
//!
//! # Example
//!
//! ```no_run
//! use report_core::{generate_report, Config};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("report.toml")?;
//! let outcome = generate_report(Path::new("results.csv"), Path::new("out"), &config)?;
//! println!("Report generated successfully at: {}", outcome.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Every setting has a default; a typical file overrides a few:
//!
//! ```toml
//! [input]
//! delimiter = ";"
//!
//! [report]
//! title = "Checkout Load Test"
//! zero_fill_throughput = true
//!
//! [thresholds]
//! p95_seconds = 1.5
//! min_success_rate = 99.0
//! ```

pub mod analysis;
pub mod coercion;
pub mod config;
pub mod error;
pub mod ingest;
pub mod output;
pub mod render;
pub mod reporter;
pub mod schema;
pub mod series;
pub mod stats;
pub mod thresholds;
pub mod throughput;

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, instrument};

// Re-export main types for convenience
pub use analysis::{Analysis, AnalysisSummary};
pub use coercion::{CoercionWarning, Dataset, Field, Sample};
pub use config::Config;
pub use error::{ReportError, Result};
pub use ingest::{Ingestor, RawRecord, RawTable};
pub use render::{RenderContext, ReportAssembler};
pub use reporter::{OutputFormat, Reporter};
pub use stats::{StatBundle, StatisticsEngine};
pub use thresholds::ThresholdOutcome;
pub use throughput::{ThroughputBucket, ThroughputSeries};

/// A successfully written report
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// Location of the HTML document
    pub path: PathBuf,
    /// Field values that could not be parsed
    pub warning_count: usize,
    pub analysis: Analysis,
}

/// Run the whole pipeline and write the report into `output_dir`.
///
/// Nothing is written unless every stage before output succeeds.
///
/// # Errors
///
/// - [`ReportError::Config`] for an unusable configuration
/// - [`ReportError::Ingest`] if the input cannot be read or parsed
/// - [`ReportError::SchemaViolation`] if a required column is missing
/// - [`ReportError::Render`] if the template fails
/// - [`ReportError::Io`] if the document cannot be written
#[instrument(skip_all, fields(input = %input.display(), output_dir = %output_dir.display()))]
pub fn generate_report(input: &Path, output_dir: &Path, config: &Config) -> Result<ReportOutcome> {
    config.validate()?;

    let table = Ingestor::new(config.input.delimiter_byte()?).read_path(input)?;
    let analysis = Analysis::from_table(&table, config)?;

    let source = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    let ctx = RenderContext {
        report: &config.report,
        source: &source,
        generated_at: Utc::now(),
    };
    let html = ReportAssembler::new()?.render(&analysis, &ctx)?;

    let path = output::write_atomic(output_dir, &config.report.file_name, &html)?;
    let warning_count = analysis.warning_count();
    if warning_count > 0 {
        info!(
            "Report written with {} invalid field values excluded",
            warning_count
        );
    }

    Ok(ReportOutcome {
        path,
        warning_count,
        analysis,
    })
}
