//! Validation, coercion and aggregation over an ingested table
//!
//! ```text
//!  RawTable ──► validate_columns ──► coerce ──► Dataset
//!                                                 │
//!          ┌──────────────┬───────────────┬───────┴────────┐
//!          ▼              ▼               ▼                ▼
//!     StatBundle   ThroughputSeries  response times  code distribution
//! ```
//!
//! Each stage returns a new value; nothing is mutated after it is built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::coercion::{coerce, Dataset, Field};
use crate::config::Config;
use crate::error::Result;
use crate::ingest::RawTable;
use crate::schema::validate_columns;
use crate::series::{response_code_distribution, response_time_series, ResponseTimePoint};
use crate::stats::{StatBundle, StatisticsEngine};
use crate::thresholds::ThresholdOutcome;
use crate::throughput::ThroughputSeries;

/// Everything the report is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub dataset: Dataset,
    pub stats: StatBundle,
    /// Sparse series, one bucket per second with traffic
    pub throughput: ThroughputSeries,
    pub response_times: Vec<ResponseTimePoint>,
    pub response_codes: BTreeMap<String, u64>,
    pub thresholds: ThresholdOutcome,
}

impl Analysis {
    /// Validate, coerce and aggregate an ingested table.
    ///
    /// # Errors
    ///
    /// [`ReportError::SchemaViolation`](crate::ReportError::SchemaViolation)
    /// when a required column is not declared. Nothing else in this stage is
    /// fatal.
    pub fn from_table(table: &RawTable, config: &Config) -> Result<Self> {
        validate_columns(&table.columns, &config.columns)?;

        let dataset = coerce(&table.records, &config.columns);
        let stats = StatisticsEngine::from_dataset(&dataset);
        let throughput = ThroughputSeries::from_dataset(&dataset);
        let response_times = response_time_series(&dataset);
        let response_codes = response_code_distribution(&dataset);
        info!("{} distinct response codes", response_codes.len());
        let thresholds = ThresholdOutcome::evaluate(&stats, &config.thresholds);

        Ok(Self {
            dataset,
            stats,
            throughput,
            response_times,
            response_codes,
            thresholds,
        })
    }

    /// Number of per-field coercion failures
    pub fn warning_count(&self) -> usize {
        self.dataset.warnings.len()
    }

    /// The part of the analysis worth printing or exporting
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            stats: self.stats.clone(),
            warning_count: self.warning_count(),
            warnings_by_field: self.dataset.warning_counts(),
            timed_samples: self.throughput.total(),
            active_seconds: self.throughput.len(),
            peak_throughput: self.throughput.peak(),
            mean_throughput: self.throughput.mean_per_active_second(),
            response_codes: self.response_codes.clone(),
            thresholds: self.thresholds.clone(),
        }
    }
}

/// Serializable digest of an [`Analysis`], without per-sample data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub stats: StatBundle,
    pub warning_count: usize,
    pub warnings_by_field: BTreeMap<Field, usize>,
    /// Samples that landed in a throughput bucket
    pub timed_samples: u64,
    pub active_seconds: usize,
    pub peak_throughput: u64,
    pub mean_throughput: f64,
    pub response_codes: BTreeMap<String, u64>,
    pub thresholds: ThresholdOutcome,
}
