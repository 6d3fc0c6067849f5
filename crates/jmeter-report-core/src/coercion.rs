//! Typed samples from raw rows
//!
//! Every [`RawRecord`] becomes exactly one [`Sample`], in input order. A field
//! that fails to parse is marked invalid on its own and recorded as a
//! [`CoercionWarning`]; the row itself is never dropped.
//!
//! | field         | accepted                              | on failure                      |
//! |---------------|---------------------------------------|---------------------------------|
//! | timestamp     | integer epoch milliseconds            | excluded from throughput        |
//! | elapsed       | finite number >= 0, milliseconds      | excluded from elapsed stats     |
//! | success       | `true`/`false`/`1`/`0`, any case      | counted as not successful       |
//! | response code | any text, passed through              | empty label                     |

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ColumnConfig;
use crate::ingest::RawRecord;

/// The four fields a sample is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Timestamp,
    Elapsed,
    Success,
    ResponseCode,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Timestamp => "timestamp",
            Field::Elapsed => "elapsed",
            Field::Success => "success",
            Field::ResponseCode => "response code",
        };
        f.write_str(name)
    }
}

/// A single field on a single row that could not be converted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoercionWarning {
    /// 1-based data row number (the header is not counted)
    pub row: usize,
    pub field: Field,
    /// Cell text as read; empty when the cell was absent
    pub raw: String,
}

impl fmt::Display for CoercionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: invalid {} {:?}", self.row, self.field, self.raw)
    }
}

/// One typed load-test measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// `None` when the timestamp did not parse
    pub timestamp: Option<DateTime<Utc>>,
    /// Response time in seconds, `None` when invalid
    pub elapsed_seconds: Option<f64>,
    /// `None` when the success cell did not match the truth table
    pub success: Option<bool>,
    pub response_code: String,
}

impl Sample {
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }
}

/// Coerced samples in input order, with the warnings produced on the way
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub samples: Vec<Sample>,
    pub warnings: Vec<CoercionWarning>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Valid elapsed values, in seconds
    pub fn elapsed_values(&self) -> Vec<f64> {
        self.samples
            .iter()
            .filter_map(|s| s.elapsed_seconds)
            .collect()
    }

    /// Success flag of every sample; invalid flags read as `false`
    pub fn success_flags(&self) -> Vec<bool> {
        self.samples.iter().map(Sample::is_success).collect()
    }

    /// Samples that can be placed in time
    pub fn timed(&self) -> impl Iterator<Item = (&Sample, DateTime<Utc>)> {
        self.samples
            .iter()
            .filter_map(|s| s.timestamp.map(|ts| (s, ts)))
    }

    /// Warning count per field, every field present
    pub fn warning_counts(&self) -> BTreeMap<Field, usize> {
        let mut counts: BTreeMap<Field, usize> = [
            Field::Timestamp,
            Field::Elapsed,
            Field::Success,
            Field::ResponseCode,
        ]
        .into_iter()
        .map(|f| (f, 0))
        .collect();
        for warning in &self.warnings {
            *counts.entry(warning.field).or_default() += 1;
        }
        counts
    }
}

/// Epoch milliseconds to an instant
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = raw.trim().parse().ok()?;
    DateTime::from_timestamp_millis(millis)
}

/// Milliseconds (integer or floating form) to seconds
pub fn parse_elapsed(raw: &str) -> Option<f64> {
    let millis: f64 = raw.trim().parse().ok()?;
    if !millis.is_finite() || millis < 0.0 {
        return None;
    }
    Some(millis / 1000.0)
}

/// Explicit truth table; `"False"` is false, `"yes"` is not a boolean
pub fn parse_success(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") || raw == "1" {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") || raw == "0" {
        Some(false)
    } else {
        None
    }
}

/// Coerce raw rows into a [`Dataset`], one sample per row.
///
/// ```
/// use report_core::coercion::coerce;
/// use report_core::config::ColumnConfig;
/// use report_core::ingest::RawRecord;
///
/// let row: RawRecord = [
///     ("timeStamp", "1700000000000"),
///     ("elapsed", "1500"),
///     ("success", "FALSE"),
///     ("responseCode", "503"),
/// ]
/// .into_iter()
/// .collect();
///
/// let dataset = coerce(&[row], &ColumnConfig::default());
/// assert_eq!(dataset.samples[0].elapsed_seconds, Some(1.5));
/// assert_eq!(dataset.samples[0].success, Some(false));
/// assert!(dataset.warnings.is_empty());
/// ```
pub fn coerce(records: &[RawRecord], columns: &ColumnConfig) -> Dataset {
    let mut warnings = Vec::new();

    let samples: Vec<Sample> = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let row = index + 1;
            let mut invalid = |field: Field, raw: &str| {
                warnings.push(CoercionWarning {
                    row,
                    field,
                    raw: raw.to_string(),
                })
            };

            let raw = cell(record, &columns.timestamp);
            let timestamp = parse_timestamp(raw);
            if timestamp.is_none() {
                invalid(Field::Timestamp, raw);
            }

            let raw = cell(record, &columns.elapsed);
            let elapsed_seconds = parse_elapsed(raw);
            if elapsed_seconds.is_none() {
                invalid(Field::Elapsed, raw);
            }

            let raw = cell(record, &columns.success);
            let success = parse_success(raw);
            if success.is_none() {
                invalid(Field::Success, raw);
            }

            let response_code = match record.get(&columns.response_code) {
                Some(code) => code.to_string(),
                None => {
                    invalid(Field::ResponseCode, "");
                    String::new()
                }
            };

            Sample {
                timestamp,
                elapsed_seconds,
                success,
                response_code,
            }
        })
        .collect();

    let dataset = Dataset { samples, warnings };
    log_summary(&dataset);
    dataset
}

fn cell<'a>(record: &'a RawRecord, column: &str) -> &'a str {
    record.get(column).unwrap_or_default()
}

fn log_summary(dataset: &Dataset) {
    info!(
        "Coerced {} samples with {} field warnings",
        dataset.len(),
        dataset.warnings.len()
    );
    if dataset.warnings.is_empty() {
        return;
    }
    for (field, count) in dataset.warning_counts() {
        if count > 0 {
            warn!("{} rows have an invalid {} value", count, field);
        }
    }
    for warning in &dataset.warnings {
        debug!("{}", warning);
    }
}
