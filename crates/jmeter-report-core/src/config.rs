//! Configuration parsing for report generation
//!
//! This module provides TOML-based configuration for the input format,
//! the column names the pipeline requires, report presentation, and
//! optional pass/fail thresholds. Every section has defaults matching a
//! stock JMeter CSV result file, so an empty file is a valid configuration.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::ReportError;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input file format
    #[serde(default)]
    pub input: InputConfig,
    /// Names of the required columns
    #[serde(default)]
    pub columns: ColumnConfig,
    /// Report presentation settings
    #[serde(default)]
    pub report: ReportConfig,
    /// Pass/fail limits
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    ///
    /// # Example
    ///
    /// ```no_run
    /// use report_core::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_file("report.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use report_core::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     [columns]
    ///     timestamp = "ts"
    ///
    ///     [thresholds]
    ///     p95_seconds = 1.5
    /// "#;
    /// let config = Config::from_str(toml)?;
    /// assert_eq!(config.columns.timestamp, "ts");
    /// assert_eq!(config.columns.elapsed, "elapsed");
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Check the values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ReportError> {
        self.input.delimiter_byte()?;

        let names = self.columns.required();
        if let Some(empty) = names.iter().find(|name| name.trim().is_empty()) {
            return Err(ReportError::Config(format!(
                "column name must not be empty (got {:?})",
                empty
            )));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(*name) {
                return Err(ReportError::Config(format!(
                    "column '{}' is mapped to more than one field",
                    name
                )));
            }
        }

        if self.report.max_fill_buckets > MAX_FILL_BUCKETS_LIMIT {
            return Err(ReportError::Config(format!(
                "report max_fill_buckets must be at most {} (got {})",
                MAX_FILL_BUCKETS_LIMIT, self.report.max_fill_buckets
            )));
        }

        let file_name = &self.report.file_name;
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            return Err(ReportError::Config(format!(
                "report file_name must be a plain file name (got {:?})",
                file_name
            )));
        }

        Ok(())
    }
}

/// Input file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Field delimiter (default: ',')
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

impl InputConfig {
    /// The delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8, ReportError> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ReportError::Config(format!(
                "delimiter must be a single ASCII character (got {:?})",
                self.delimiter
            ))),
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Column names for the four fields every sample needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_timestamp_column")]
    pub timestamp: String,
    #[serde(default = "default_elapsed_column")]
    pub elapsed: String,
    #[serde(default = "default_success_column")]
    pub success: String,
    #[serde(default = "default_response_code_column")]
    pub response_code: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            timestamp: default_timestamp_column(),
            elapsed: default_elapsed_column(),
            success: default_success_column(),
            response_code: default_response_code_column(),
        }
    }
}

impl ColumnConfig {
    /// The required column set, in the order missing columns are reported
    pub fn required(&self) -> [&str; 4] {
        [
            self.timestamp.as_str(),
            self.elapsed.as_str(),
            self.success.as_str(),
            self.response_code.as_str(),
        ]
    }
}

fn default_timestamp_column() -> String {
    "timeStamp".to_string()
}

fn default_elapsed_column() -> String {
    "elapsed".to_string()
}

fn default_success_column() -> String {
    "success".to_string()
}

fn default_response_code_column() -> String {
    "responseCode".to_string()
}

/// Upper bound for `max_fill_buckets`: one week of seconds
pub const MAX_FILL_BUCKETS_LIMIT: usize = 7 * 86_400;

/// Report presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Heading of the generated document
    #[serde(default = "default_title")]
    pub title: String,
    /// File name written inside the output directory (default: jmeter_report.html)
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Emit zero-count buckets for silent seconds in the throughput chart
    #[serde(default)]
    pub zero_fill_throughput: bool,
    /// Largest dense series zero-fill may produce (default: one day of seconds)
    #[serde(default = "default_max_fill_buckets")]
    pub max_fill_buckets: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            file_name: default_file_name(),
            zero_fill_throughput: false,
            max_fill_buckets: default_max_fill_buckets(),
        }
    }
}

fn default_title() -> String {
    "JMeter Test Results Report".to_string()
}

fn default_file_name() -> String {
    "jmeter_report.html".to_string()
}

fn default_max_fill_buckets() -> usize {
    86_400
}

/// Performance thresholds for pass/fail determination
///
/// Elapsed limits are in seconds, the success rate in percent.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ThresholdsConfig {
    pub average_seconds: Option<f64>,
    pub p90_seconds: Option<f64>,
    pub p95_seconds: Option<f64>,
    pub p99_seconds: Option<f64>,
    pub min_success_rate: Option<f64>,
}

impl ThresholdsConfig {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
