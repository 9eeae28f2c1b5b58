//! Descriptive statistics used by the report builder.
//!
//! Numerical notes:
//! - Quantiles use linear interpolation between order statistics
//!   (`pos = p * (n - 1)`), the convention most plotting libraries use for
//!   box plots.
//! - Rounding to two decimals is half-to-even on the scaled value.

use serde::Serialize;

/// Arithmetic mean; `None` for an empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Round to two decimals.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Linear-interpolated quantile of an already sorted slice.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Five-number summary plus Tukey whiskers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub n: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest observation within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest observation within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    /// Observations beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = quantile_sorted(&sorted, 0.25)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted.iter().copied().find(|&v| v >= lo_fence).unwrap_or(q1);
        let upper_whisker = sorted.iter().rev().copied().find(|&v| v <= hi_fence).unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lower_whisker || v > upper_whisker)
            .collect();

        Some(Self {
            n: sorted.len(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Index of the right-closed bin `(edges[i], edges[i + 1]]` containing `v`.
///
/// Values at or below the first edge, above the last edge, or non-finite fall
/// outside every bin.
pub fn bin_index(edges: &[f64], v: f64) -> Option<usize> {
    if !v.is_finite() || edges.len() < 2 {
        return None;
    }
    edges
        .windows(2)
        .position(|w| v > w[0] && v <= w[1])
}
