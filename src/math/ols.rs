//! Ordinary least squares.
//!
//! The scatter chart overlays one trend line per color group:
//!
//! ```text
//! minimize Σ (y_i - (a + b x_i))^2
//! ```
//!
//! We build the `[1, x]` design matrix and solve with SVD, which stays
//! well-behaved for tall matrices. Nalgebra's `QR::solve` is intended for
//! square systems and will panic for non-square ones.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// A fitted straight line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
    pub n: usize,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit an OLS line through `points`.
///
/// Needs at least two points with distinct x; otherwise the slope is not
/// identified and `None` is returned.
pub fn fit_line(points: &[(f64, f64)]) -> Option<LineFit> {
    let n = points.len();
    if n < 2 {
        return None;
    }
    let x0 = points[0].0;
    if points.iter().all(|&(x, _)| x == x0) {
        return None;
    }

    let mut design = Vec::with_capacity(n * 2);
    for &(x, _) in points {
        design.push(1.0);
        design.push(x);
    }
    let x = DMatrix::from_row_slice(n, 2, &design);
    let y = DVector::from_iterator(n, points.iter().map(|&(_, y)| y));

    let beta = solve_least_squares(&x, &y)?;
    let intercept = beta[0];
    let slope = beta[1];

    let mean_y = y.mean();
    let ss_tot: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .map(|&(px, py)| (py - (intercept + slope * px)).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    Some(LineFit {
        intercept,
        slope,
        r_squared,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn fit_line_recovers_noisy_trend() {
        // y = 1000 + 500x with symmetric +-100 noise.
        let pts = [(10.0, 6100.0), (20.0, 10900.0), (30.0, 16100.0), (40.0, 20900.0)];
        let fit = fit_line(&pts).unwrap();
        assert!((fit.slope - 496.0).abs() < 1e-6, "slope={}", fit.slope);
        assert!((fit.predict(25.0) - 13500.0).abs() < 1e-6);
        assert!(fit.r_squared > 0.99 && fit.r_squared <= 1.0);
        assert_eq!(fit.n, 4);
    }

    #[test]
    fn fit_line_needs_distinct_x() {
        assert!(fit_line(&[(1.0, 2.0)]).is_none());
        assert!(fit_line(&[(1.0, 2.0), (1.0, 3.0)]).is_none());
    }
}
