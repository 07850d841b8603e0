//! Tail diagnostics for debugging a flow-index estimate.
//!
//! Reports the raw pairwise slopes behind `n̂` next to a least-squares slope
//! over the same tail and the noise actually injected per point. Nothing here
//! feeds back into `AnalysisResult`.

use crate::domain::FlowCurve;
use crate::error::CurveError;
use crate::fit::analyzer::{high_shear_tail, tail_start, tail_mean_slope};
use crate::math::{fit_line, pairwise_log_slopes};
use crate::models::{MIN_VISCOSITY, carreau_viscosity};

#[derive(Debug, Clone)]
pub struct TailDiagnostics {
    pub sample_id: String,
    /// Index of the first tail point in the full curve.
    pub tail_start: usize,
    pub tail_len: usize,
    pub shear_range: (f64, f64),
    pub pairwise_slopes: Vec<f64>,
    pub mean_slope: f64,
    /// Least-squares slope of `log10 η` on `log10 γ̇`; `None` if the solve failed.
    pub regression_slope: Option<f64>,
    pub regression_r_squared: Option<f64>,
    /// Largest `|η_generated / η_model − 1|` over the whole curve.
    pub max_noise_deviation: f64,
    /// Points where the `MIN_VISCOSITY` floor kicked in.
    pub clamped_points: usize,
}

pub fn tail_diagnostics(curve: &FlowCurve) -> Result<TailDiagnostics, CurveError> {
    let mean_slope = tail_mean_slope(&curve.points)?;
    let start = tail_start(curve.points.len());
    let tail = high_shear_tail(&curve.points);
    let pairwise_slopes = pairwise_log_slopes(tail, start)?;

    let xs: Vec<f64> = tail.iter().map(|p| p.shear_rate.log10()).collect();
    let ys: Vec<f64> = tail.iter().map(|p| p.viscosity.log10()).collect();
    let line = fit_line(&xs, &ys);

    let mut max_noise_deviation: f64 = 0.0;
    let mut clamped_points = 0;
    for (shear_rate, viscosity) in curve.shear_rates().zip(curve.viscosities()) {
        let model = carreau_viscosity(&curve.params, shear_rate);
        if viscosity <= MIN_VISCOSITY {
            clamped_points += 1;
        }
        if model > 0.0 {
            max_noise_deviation = max_noise_deviation.max((viscosity / model - 1.0).abs());
        }
    }

    Ok(TailDiagnostics {
        sample_id: curve.params.id.clone(),
        tail_start: start,
        tail_len: tail.len(),
        shear_range: (tail[0].shear_rate, tail[tail.len() - 1].shear_rate),
        pairwise_slopes,
        mean_slope,
        regression_slope: line.map(|l| l.slope),
        regression_r_squared: line.map(|l| l.r_squared),
        max_noise_deviation,
        clamped_points,
    })
}
