//! Response-time points and the response-code distribution.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coercion::Dataset;

/// One sample placed in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseTimePoint {
    pub timestamp: DateTime<Utc>,
    pub elapsed_seconds: f64,
}

/// Points for every sample with a valid timestamp and elapsed value, in input order
pub fn response_time_series(dataset: &Dataset) -> Vec<ResponseTimePoint> {
    dataset
        .timed()
        .filter_map(|(sample, timestamp)| {
            sample.elapsed_seconds.map(|elapsed_seconds| ResponseTimePoint {
                timestamp,
                elapsed_seconds,
            })
        })
        .collect()
}

/// Sample count per response-code label.
///
/// Ordered by label so repeated runs render identically.
pub fn response_code_distribution(dataset: &Dataset) -> BTreeMap<String, u64> {
    let mut distribution = BTreeMap::new();
    for sample in &dataset.samples {
        *distribution
            .entry(sample.response_code.clone())
            .or_insert(0) += 1;
    }
    distribution
}
