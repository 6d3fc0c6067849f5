//! Aggregate metrics over a coerced dataset.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::percentiles::{percentile_of_sorted, sort_samples};
use crate::coercion::Dataset;

pub const TOTAL_REQUESTS: &str = "Total Requests";
pub const AVERAGE: &str = "Average Response Time";
pub const MEDIAN: &str = "Median Response Time";
pub const MIN: &str = "Min Response Time";
pub const MAX: &str = "Max Response Time";
pub const SUCCESS_RATE: &str = "Success Rate";
pub const P90: &str = "90th Percentile";
pub const P95: &str = "95th Percentile";
pub const P99: &str = "99th Percentile";
pub const STATISTICS_UNAVAILABLE: &str = "Statistics Unavailable";

/// Reasons the statistics stage can fail
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatisticsError {
    #[error("elapsed value #{index} is not a finite non-negative number ({value})")]
    InvalidSample { index: usize, value: f64 },

    #[error("{elapsed} elapsed values but only {total} requests")]
    ElapsedExceedsTotal { elapsed: usize, total: usize },

    #[error("{0} is not finite")]
    NonFiniteResult(&'static str),
}

/// Scalar metrics for one dataset, elapsed values in seconds.
///
/// Always fully populated: metrics undefined on an empty elapsed set are
/// `0.0`. A degraded bundle keeps only `total_requests` meaningful and sets
/// `statistics_unavailable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBundle {
    pub total_requests: usize,
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Percent of all requests, 0..=100
    pub success_rate: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    /// Number of valid elapsed values behind the elapsed metrics
    pub elapsed_count: usize,
    pub statistics_unavailable: bool,
}

/// One labelled metric, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatEntry {
    pub label: &'static str,
    pub value: f64,
    pub display: String,
}

impl StatBundle {
    /// Minimal bundle used when the statistics stage fails
    pub fn degraded(total_requests: usize) -> Self {
        Self {
            total_requests,
            average: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            success_rate: 0.0,
            p90: 0.0,
            p95: 0.0,
            p99: 0.0,
            elapsed_count: 0,
            statistics_unavailable: true,
        }
    }

    /// Labelled metrics in display order
    pub fn entries(&self) -> Vec<StatEntry> {
        let count = |label, value: usize| StatEntry {
            label,
            value: value as f64,
            display: value.to_string(),
        };

        if self.statistics_unavailable {
            return vec![
                count(TOTAL_REQUESTS, self.total_requests),
                StatEntry {
                    label: STATISTICS_UNAVAILABLE,
                    value: 1.0,
                    display: "yes".to_string(),
                },
            ];
        }

        let seconds = |label, value: f64| StatEntry {
            label,
            value,
            display: format!("{:.2} s", value),
        };
        vec![
            count(TOTAL_REQUESTS, self.total_requests),
            seconds(AVERAGE, self.average),
            seconds(MEDIAN, self.median),
            seconds(MIN, self.min),
            seconds(MAX, self.max),
            StatEntry {
                label: SUCCESS_RATE,
                value: self.success_rate,
                display: format!("{:.2} %", self.success_rate),
            },
            seconds(P90, self.p90),
            seconds(P95, self.p95),
            seconds(P99, self.p99),
        ]
    }
}

/// Computes [`StatBundle`]s
pub struct StatisticsEngine;

impl StatisticsEngine {
    /// Statistics for a coerced dataset
    pub fn from_dataset(dataset: &Dataset) -> StatBundle {
        Self::compute(&dataset.elapsed_values(), &dataset.success_flags())
    }

    /// Compute the bundle, degrading instead of failing.
    ///
    /// `elapsed` holds the valid elapsed values in seconds, `success` one flag
    /// per request. The two may differ in length.
    ///
    /// ```
    /// use report_core::stats::StatisticsEngine;
    ///
    /// let stats = StatisticsEngine::compute(&[0.1, 0.2], &[true, false]);
    /// assert_eq!(stats.total_requests, 2);
    /// assert_eq!(stats.average, 0.15);
    /// assert_eq!(stats.success_rate, 50.0);
    /// ```
    pub fn compute(elapsed: &[f64], success: &[bool]) -> StatBundle {
        match Self::try_compute(elapsed, success) {
            Ok(bundle) => {
                info!(
                    "Computed statistics over {} requests ({} with valid elapsed)",
                    bundle.total_requests, bundle.elapsed_count
                );
                bundle
            }
            Err(e) => {
                warn!("Statistics unavailable, reporting request count only: {}", e);
                StatBundle::degraded(success.len())
            }
        }
    }

    /// Compute the bundle, surfacing the failure
    pub fn try_compute(elapsed: &[f64], success: &[bool]) -> Result<StatBundle, StatisticsError> {
        let total_requests = success.len();
        if elapsed.len() > total_requests {
            return Err(StatisticsError::ElapsedExceedsTotal {
                elapsed: elapsed.len(),
                total: total_requests,
            });
        }
        if let Some((index, &value)) = elapsed
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(StatisticsError::InvalidSample { index, value });
        }

        let successes = success.iter().filter(|&&ok| ok).count();
        let success_rate = if total_requests == 0 {
            0.0
        } else {
            successes as f64 / total_requests as f64 * 100.0
        };

        let mut sorted = elapsed.to_vec();
        sort_samples(&mut sorted);

        let (average, median, min, max, p90, p95, p99) = if sorted.is_empty() {
            (0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
        } else {
            let sum: f64 = sorted.iter().sum();
            let average = checked(AVERAGE, sum / sorted.len() as f64)?;
            let at = |p: f64| percentile_of_sorted(&sorted, p).unwrap_or(0.0);
            (
                average,
                at(50.0),
                sorted[0],
                sorted[sorted.len() - 1],
                at(90.0),
                at(95.0),
                at(99.0),
            )
        };

        Ok(StatBundle {
            total_requests,
            average: round2(average),
            median: round2(checked(MEDIAN, median)?),
            min: round2(min),
            max: round2(max),
            success_rate: round2(success_rate),
            p90: round2(checked(P90, p90)?),
            p95: round2(checked(P95, p95)?),
            p99: round2(checked(P99, p99)?),
            elapsed_count: sorted.len(),
            statistics_unavailable: false,
        })
    }
}

fn checked(metric: &'static str, value: f64) -> Result<f64, StatisticsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StatisticsError::NonFiniteResult(metric))
    }
}

/// Round to two decimals, ties to even (0.125 becomes 0.12)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
