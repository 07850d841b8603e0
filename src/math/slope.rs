//! Local log-log slopes.
//!
//! In the power-law regime `log10(η) ≈ (n−1)·log10(γ̇) + K`, so the slope
//! between neighbouring points estimates `n − 1`.

use crate::domain::RheologyPoint;
use crate::error::CurveError;

/// Slope of `log10(viscosity)` vs `log10(shear_rate)` for each adjacent pair.
///
/// Returns `n − 1` values for `n` points. Fails instead of producing NaN/∞
/// when a value is not finite and positive or a pair has no shear-rate spread. `offset` is
/// added to reported indices so errors point into the full curve.
pub fn pairwise_log_slopes(points: &[RheologyPoint], offset: usize) -> Result<Vec<f64>, CurveError> {
    for (i, p) in points.iter().enumerate() {
        if !(p.shear_rate.is_finite() && p.shear_rate > 0.0) {
            return Err(CurveError::NonPositiveValue {
                quantity: "shear rate",
                index: offset + i,
                value: p.shear_rate,
            });
        }
        if !(p.viscosity.is_finite() && p.viscosity > 0.0) {
            return Err(CurveError::NonPositiveValue {
                quantity: "viscosity",
                index: offset + i,
                value: p.viscosity,
            });
        }
    }

    let mut out = Vec::with_capacity(points.len().saturating_sub(1));
    for (i, w) in points.windows(2).enumerate() {
        let (p1, p2) = (w[0], w[1]);
        if !(p2.shear_rate > p1.shear_rate) {
            return Err(CurveError::NonIncreasingShearRate {
                index: offset + i + 1,
                previous: p1.shear_rate,
                current: p2.shear_rate,
            });
        }
        let d_log_eta = p2.viscosity.log10() - p1.viscosity.log10();
        let d_log_gamma = p2.shear_rate.log10() - p1.shear_rate.log10();
        out.push(d_log_eta / d_log_gamma);
    }
    Ok(out)
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pt(shear_rate: f64, viscosity: f64) -> RheologyPoint {
        RheologyPoint {
            shear_rate,
            viscosity,
            shear_stress: shear_rate * viscosity / 1000.0,
        }
    }

    #[test]
    fn pure_power_law_has_constant_slope() {
        // η = 5·γ̇^(-0.4)
        let pts: Vec<_> = [1.0, 10.0, 100.0, 1000.0]
            .iter()
            .map(|&g: &f64| pt(g, 5.0 * g.powf(-0.4)))
            .collect();
        let slopes = pairwise_log_slopes(&pts, 0).unwrap();
        assert_eq!(slopes.len(), 3);
        for s in slopes {
            assert_relative_eq!(s, -0.4, epsilon = 1e-12);
        }
    }

    #[test]
    fn mean_is_not_a_regression() {
        // Uneven spacing: the mean weights each pair equally.
        let pts = vec![pt(1.0, 1.0), pt(10.0, 1.0), pt(100.0, 0.1)];
        let slopes = pairwise_log_slopes(&pts, 0).unwrap();
        assert_relative_eq!(mean(&slopes).unwrap(), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn rejects_flat_shear_rate() {
        let pts = vec![pt(1.0, 2.0), pt(1.0, 1.0)];
        assert!(matches!(
            pairwise_log_slopes(&pts, 40),
            Err(CurveError::NonIncreasingShearRate { index: 41, .. })
        ));
    }

    #[test]
    fn rejects_non_positive_viscosity() {
        let pts = vec![pt(1.0, 2.0), pt(2.0, 0.0)];
        assert!(matches!(
            pairwise_log_slopes(&pts, 0),
            Err(CurveError::NonPositiveValue { quantity: "viscosity", index: 1, .. })
        ));
    }

    #[test]
    fn rejects_infinite_values() {
        let pts = vec![pt(1.0, 2.0), pt(2.0, f64::INFINITY), pt(3.0, 1.0)];
        assert!(matches!(
            pairwise_log_slopes(&pts, 10),
            Err(CurveError::NonPositiveValue { quantity: "viscosity", index: 11, .. })
        ));

        let pts = vec![pt(1.0, 2.0), pt(f64::INFINITY, 1.0)];
        assert!(matches!(
            pairwise_log_slopes(&pts, 0),
            Err(CurveError::NonPositiveValue { quantity: "shear rate", index: 1, .. })
        ));
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert!(mean(&[]).is_none());
    }
}
