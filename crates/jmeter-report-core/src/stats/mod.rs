//! Statistical analysis of result samples
//!
//! This module provides the percentile calculation and the engine that turns
//! a coerced dataset into a [`StatBundle`].
//!
//! # Examples
//!
//! ```
//! use report_core::stats::{percentile, StatisticsEngine};
//!
//! let elapsed = vec![0.12, 0.40, 0.18, 0.25, 1.10];
//! let success = vec![true, true, false, true, true];
//!
//! let p95 = percentile(&elapsed, 95.0).unwrap();
//! let stats = StatisticsEngine::compute(&elapsed, &success);
//! assert_eq!(stats.total_requests, 5);
//! assert_eq!(stats.success_rate, 80.0);
//! assert!(stats.p95 <= stats.max && p95 > stats.p90);
//! ```

pub mod engine;
pub mod percentiles;

pub use engine::{round2, StatBundle, StatEntry, StatisticsEngine, StatisticsError};
pub use percentiles::{percentile, percentile_of_sorted};
