//! Normalization Utilities
//!
//! Rank-based percentiles and min-max scaling used to put sector shares,
//! growth rates, and regional indicators on a common 0-1 scale.

/// Percentile rank of `value` within `distribution`
///
/// Algorithm:
/// 1. Sort the distribution ascending (NaN entries are ignored)
/// 2. Empty → 0.0, single element → 1.0
/// 3. Otherwise: left insertion index of `value` / (count - 1)
///
/// Rank-based, not interpolated: ties resolve to the leftmost position.
pub fn percentile_rank(distribution: &[f64], value: f64) -> f64 {
    let mut sorted: Vec<f64> = distribution.iter().copied().filter(|v| !v.is_nan()).collect();
    match sorted.len() {
        0 => return 0.0,
        1 => return 1.0,
        _ => {}
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = sorted.partition_point(|v| *v < value);
    position as f64 / (sorted.len() - 1) as f64
}

/// Min-max scale to [0, 1]
///
/// A flat distribution carries no discriminating signal: every value maps
/// to exactly 0.5.
pub fn minmax_scale(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    if span == 0.0 {
        return vec![0.5; values.len()];
    }
    values.iter().map(|v| (v - min) / span).collect()
}

/// Round to a fixed number of decimals
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
