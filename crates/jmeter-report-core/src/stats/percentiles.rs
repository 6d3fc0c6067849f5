//! Percentile calculations for response times.
//!
//! Percentiles use linear interpolation between the closest ranks: for
//! percentile `p` over `n` sorted values the rank is `p / 100 * (n - 1)`.

use std::cmp::Ordering;

/// Calculate percentile value from a slice of f64 samples.
///
/// Uses linear interpolation between nearest ranks for accurate percentile estimation.
///
/// # Arguments
///
/// * `samples` - Slice of samples (will be sorted internally)
/// * `p` - Percentile to calculate (0.0 to 100.0)
///
/// # Returns
///
/// * `Some(value)` - The percentile value
/// * `None` - If samples is empty or p is invalid
///
/// # Examples
///
/// ```
/// use report_core::stats::percentiles::percentile;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let p50 = percentile(&data, 50.0);
/// assert_eq!(p50, Some(3.0));
/// ```
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    let mut sorted = samples.to_vec();
    sort_samples(&mut sorted);
    percentile_of_sorted(&sorted, p)
}

/// Same as [`percentile`] for data already sorted ascending.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }

    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = rank.ceil() as usize;

    if lower_index == upper_index {
        Some(sorted[lower_index])
    } else {
        let lower_value = sorted[lower_index];
        let upper_value = sorted[upper_index];
        let fraction = rank - lower_index as f64;
        Some(lower_value + fraction * (upper_value - lower_value))
    }
}

/// Sort ascending; NaN compares equal so it never panics
pub fn sort_samples(samples: &mut [f64]) {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}
