//! Requests per second
//!
//! Samples are grouped into 1-second buckets by flooring their timestamp.
//! The series is sparse: a second without samples has no bucket, so a line
//! drawn through it connects across the silence instead of dropping to zero.
//! [`ThroughputSeries::zero_filled`] builds the dense variant on request.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::coercion::Dataset;

/// One second of traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThroughputBucket {
    pub bucket_start: DateTime<Utc>,
    pub count: u64,
}

/// Buckets ascending by start, each with at least one sample unless zero-filled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThroughputSeries {
    pub buckets: Vec<ThroughputBucket>,
}

impl ThroughputSeries {
    /// Bucket a set of instants.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use report_core::throughput::ThroughputSeries;
    ///
    /// let t = |ms| Utc.timestamp_millis_opt(ms).unwrap();
    /// let series = ThroughputSeries::from_instants([t(0), t(500), t(2_100)]);
    /// let counts: Vec<u64> = series.buckets.iter().map(|b| b.count).collect();
    /// assert_eq!(counts, vec![2, 1]);
    /// ```
    pub fn from_instants<I>(instants: I) -> Self
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
        for instant in instants {
            *counts.entry(instant.timestamp()).or_default() += 1;
        }

        let buckets = counts
            .into_iter()
            .filter_map(|(second, count)| {
                DateTime::from_timestamp(second, 0).map(|bucket_start| ThroughputBucket {
                    bucket_start,
                    count,
                })
            })
            .collect();
        Self { buckets }
    }

    /// Throughput of every sample with a valid timestamp
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let series = Self::from_instants(dataset.timed().map(|(_, ts)| ts));
        info!(
            "Bucketed {} timed samples into {} one-second buckets",
            series.total(),
            series.len()
        );
        series
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all bucket counts
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Busiest second
    pub fn peak(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Mean requests per second over the seconds that had traffic
    pub fn mean_per_active_second(&self) -> f64 {
        if self.buckets.is_empty() {
            0.0
        } else {
            self.total() as f64 / self.buckets.len() as f64
        }
    }

    /// Number of buckets a dense series would have
    pub fn span_seconds(&self) -> usize {
        match (self.buckets.first(), self.buckets.last()) {
            (Some(first), Some(last)) => {
                let span = last.bucket_start.timestamp() - first.bucket_start.timestamp();
                usize::try_from(span).map_or(usize::MAX, |s| s.saturating_add(1))
            }
            _ => 0,
        }
    }

    /// Dense copy with zero-count buckets for silent seconds.
    ///
    /// Returns `None` when the dense series would have more than
    /// `max_buckets` entries.
    pub fn zero_filled(&self, max_buckets: usize) -> Option<Self> {
        let span = self.span_seconds();
        if span > max_buckets {
            return None;
        }
        let Some(first) = self.buckets.first() else {
            return Some(Self::default());
        };

        let start = first.bucket_start.timestamp();
        let mut dense = Vec::with_capacity(span);
        let mut observed = self.buckets.iter().peekable();
        for offset in 0..span as i64 {
            let second = start + offset;
            let count = match observed.peek() {
                Some(bucket) if bucket.bucket_start.timestamp() == second => {
                    observed.next().map_or(0, |b| b.count)
                }
                _ => 0,
            };
            if let Some(bucket_start) = DateTime::from_timestamp(second, 0) {
                dense.push(ThroughputBucket {
                    bucket_start,
                    count,
                });
            }
        }
        Some(Self { buckets: dense })
    }

    /// The series to chart: dense when asked for and affordable, sparse otherwise
    pub fn for_display(&self, zero_fill: bool, max_buckets: usize) -> Self {
        if !zero_fill {
            return self.clone();
        }
        match self.zero_filled(max_buckets) {
            Some(dense) => dense,
            None => {
                warn!(
                    span_seconds = self.span_seconds(),
                    max_buckets,
                    "Throughput span exceeds the zero-fill limit; keeping the sparse series"
                );
                self.clone()
            }
        }
    }
}
