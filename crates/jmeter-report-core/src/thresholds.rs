//! Pass/fail evaluation against configured limits.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ThresholdsConfig;
use crate::stats::engine::{AVERAGE, P90, P95, P99};
use crate::stats::StatBundle;

/// Result of checking a [`StatBundle`] against [`ThresholdsConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdOutcome {
    /// Whether any limit was configured
    pub evaluated: bool,
    pub passed: bool,
    pub failures: Vec<String>,
}

impl ThresholdOutcome {
    /// Check every configured limit; violations never abort the run
    pub fn evaluate(stats: &StatBundle, thresholds: &ThresholdsConfig) -> Self {
        let mut failures = Vec::new();

        let elapsed_limits = [
            (AVERAGE, thresholds.average_seconds, stats.average),
            (P90, thresholds.p90_seconds, stats.p90),
            (P95, thresholds.p95_seconds, stats.p95),
            (P99, thresholds.p99_seconds, stats.p99),
        ];
        for (label, limit, actual) in elapsed_limits {
            let Some(limit) = limit else { continue };
            if stats.statistics_unavailable {
                failures.push(format!(
                    "{} could not be checked against {:.2}s: statistics unavailable",
                    label, limit
                ));
            } else if actual > limit {
                failures.push(format!(
                    "{} ({:.2}s) exceeds threshold ({:.2}s)",
                    label, actual, limit
                ));
            }
        }

        if let Some(minimum) = thresholds.min_success_rate {
            if stats.statistics_unavailable {
                failures.push(format!(
                    "Success Rate could not be checked against {:.2}%: statistics unavailable",
                    minimum
                ));
            } else if stats.success_rate < minimum {
                failures.push(format!(
                    "Success Rate ({:.2}%) is below threshold ({:.2}%)",
                    stats.success_rate, minimum
                ));
            }
        }

        for failure in &failures {
            warn!("Threshold violation: {}", failure);
        }

        Self {
            evaluated: !thresholds.is_empty(),
            passed: failures.is_empty(),
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatisticsEngine;

    fn stats() -> StatBundle {
        StatisticsEngine::compute(&[0.1, 0.2, 0.3, 2.0], &[true, true, true, false])
    }

    #[test]
    fn test_no_thresholds_passes() {
        let outcome = ThresholdOutcome::evaluate(&stats(), &ThresholdsConfig::default());
        assert!(!outcome.evaluated);
        assert!(outcome.passed);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_p95_exceeded() {
        let thresholds = ThresholdsConfig {
            p95_seconds: Some(1.0),
            ..Default::default()
        };
        let outcome = ThresholdOutcome::evaluate(&stats(), &thresholds);
        assert!(outcome.evaluated);
        assert!(!outcome.passed);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].starts_with("95th Percentile"));
    }

    #[test]
    fn test_success_rate_below_minimum() {
        let thresholds = ThresholdsConfig {
            min_success_rate: Some(99.0),
            average_seconds: Some(5.0),
            ..Default::default()
        };
        let outcome = ThresholdOutcome::evaluate(&stats(), &thresholds);
        assert_eq!(
            outcome.failures,
            vec!["Success Rate (75.00%) is below threshold (99.00%)".to_string()]
        );
    }

    #[test]
    fn test_limits_met() {
        let thresholds = ThresholdsConfig {
            average_seconds: Some(1.0),
            p99_seconds: Some(2.0),
            min_success_rate: Some(75.0),
            ..Default::default()
        };
        assert!(ThresholdOutcome::evaluate(&stats(), &thresholds).passed);
    }

    #[test]
    fn test_degraded_bundle_fails_configured_limits() {
        let thresholds = ThresholdsConfig {
            p90_seconds: Some(1.0),
            ..Default::default()
        };
        let outcome = ThresholdOutcome::evaluate(&StatBundle::degraded(3), &thresholds);
        assert!(!outcome.passed);
        assert!(outcome.failures[0].contains("statistics unavailable"));
    }
}
