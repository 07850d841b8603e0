//! Least squares line fit.
//!
//! Only used as a diagnostic cross-check of the tail slope (see
//! `fit::diagnostics`); the reported flow behavior index never comes from here.
//!
//! We solve
//!
//! ```text
//! minimize Σ (y_i − (a + b·x_i))^2
//! ```
//!
//! via SVD so nearly collinear inputs (e.g. a clamped, flat tail) still
//! produce an answer instead of a panic.

use nalgebra::{DMatrix, DVector};

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

/// Straight-line fit `y = intercept + slope·x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; `1.0` when `y` has no variance and the fit is exact.
    pub r_squared: f64,
}

/// Fit a line through `(xs[i], ys[i])`. Needs at least two points.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<LineFit> {
    let n = xs.len();
    if n < 2 || ys.len() != n {
        return None;
    }

    let x = DMatrix::from_fn(n, 2, |r, c| if c == 0 { 1.0 } else { xs[r] });
    let y = DVector::from_column_slice(ys);
    let beta = solve_least_squares(&x, &y)?;
    let (intercept, slope) = (beta[0], beta[1]);

    let y_mean = ys.iter().sum::<f64>() / n as f64;
    let mut sse = 0.0;
    let mut sst = 0.0;
    for (&xi, &yi) in xs.iter().zip(ys) {
        let fit = intercept + slope * xi;
        sse += (yi - fit).powi(2);
        sst += (yi - y_mean).powi(2);
    }
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };

    Some(LineFit {
        slope,
        intercept,
        r_squared,
    })
}
