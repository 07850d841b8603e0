//! Log-spaced grids.
//!
//! Shear rates are sampled geometrically so each decade gets the same number
//! of points; the high-shear tail stays resolved on a log-log plot.

use crate::error::CurveError;

/// Generate `steps` points between `min` and `max` (inclusive), evenly spaced
/// in `log10`.
///
/// Point `i` is `10^(log10(min) + (i/(steps-1)) · (log10(max) − log10(min)))`.
pub fn log10_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, CurveError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(CurveError::InvalidShearRange { min, max });
    }
    if steps < 2 {
        return Err(CurveError::TooFewPoints {
            requested: steps,
            minimum: 2,
        });
    }

    let lo = min.log10();
    let hi = max.log10();
    let denom = steps as f64 - 1.0;

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        let u = i as f64 / denom;
        out.push(10f64.powf(lo + u * (hi - lo)));
    }
    Ok(out)
}
