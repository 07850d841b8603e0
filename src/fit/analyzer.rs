//! Flow behavior index and cluster length scale from a generated curve.
//!
//! Given a curve sorted by shear rate:
//! - take the high-shear tail (last `ceil(N/5)` points)
//! - average the pairwise log-log slopes over the tail (`n̂ = 1 + mean`)
//! - combine `n̂` with λ into the cluster length scale
//!
//! `n̂` always comes from the pairwise mean. A least-squares slope over the same
//! tail is reported only by `fit::diagnostics`.

use crate::domain::{AnalysisResult, FlowCurve, ModelParams, RheologyPoint};
use crate::error::CurveError;
use crate::math::{mean, pairwise_log_slopes};

/// `|n̂ − 1|` below this flags the sample as Newtonian.
pub const NEWTONIAN_TOLERANCE: f64 = 0.05;

/// Cluster scale weight on λ. Calibration constant.
pub const CLUSTER_RELAXATION_WEIGHT: f64 = 10.0;

/// Cluster scale weight on the shear-thinning degree `1 − n̂`. Calibration constant.
pub const CLUSTER_THINNING_WEIGHT: f64 = 50.0;

/// Fraction denominator for the tail: the last `ceil(N / 5)` points.
const TAIL_DIVISOR: usize = 5;

/// Analyze a generated curve with the parameters it was generated from.
pub fn analyze_sample(curve: &FlowCurve) -> Result<AnalysisResult, CurveError> {
    analyze_points(&curve.params, &curve.points)
}

/// Analyze raw points. `points` must be sorted by strictly increasing shear rate
/// within the tail.
pub fn analyze_points(params: &ModelParams, points: &[RheologyPoint]) -> Result<AnalysisResult, CurveError> {
    let flow_behavior_index = 1.0 + tail_mean_slope(points)?;
    let cluster_length_scale = cluster_length_scale(params.relaxation_time, flow_behavior_index);

    Ok(AnalysisResult {
        sample_id: params.id.clone(),
        flow_behavior_index,
        cluster_length_scale,
        is_newtonian: is_newtonian(flow_behavior_index),
    })
}

/// The high-shear subset: last `ceil(N / 5)` points.
///
/// Same split as dropping the first `floor(0.8·N)` points, done in integers.
pub fn high_shear_tail(points: &[RheologyPoint]) -> &[RheologyPoint] {
    let len = points.len().div_ceil(TAIL_DIVISOR);
    &points[points.len() - len..]
}

/// Index of the first tail point within the full curve.
pub fn tail_start(total: usize) -> usize {
    total - total.div_ceil(TAIL_DIVISOR)
}

/// Mean pairwise log-log slope over the high-shear tail (≈ `n − 1`).
pub fn tail_mean_slope(points: &[RheologyPoint]) -> Result<f64, CurveError> {
    let tail = high_shear_tail(points);
    if tail.len() < 2 {
        return Err(CurveError::TailTooShort {
            total: points.len(),
            tail: tail.len(),
        });
    }

    let slopes = pairwise_log_slopes(tail, tail_start(points.len()))?;
    // Non-empty: the tail holds at least two points.
    Ok(mean(&slopes).unwrap_or(0.0))
}

/// `max(0, λ·10 + (1 − n̂)·50)`.
///
/// Toy metric: longer relaxation and stronger thinning both push it up. Not
/// a physical length.
pub fn cluster_length_scale(relaxation_time: f64, flow_behavior_index: f64) -> f64 {
    let raw = relaxation_time * CLUSTER_RELAXATION_WEIGHT
        + (1.0 - flow_behavior_index) * CLUSTER_THINNING_WEIGHT;
    raw.max(0.0)
}

pub fn is_newtonian(flow_behavior_index: f64) -> bool {
    (flow_behavior_index - 1.0).abs() < NEWTONIAN_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::data::{default_samples, generate_flow_curve};
    use crate::domain::NoiseConfig;

    fn params(eta0: f64, eta_inf: f64, lambda: f64, n: f64) -> ModelParams {
        ModelParams {
            id: "sample-t".to_string(),
            name: "T".to_string(),
            zero_shear_viscosity: eta0,
            infinite_shear_viscosity: eta_inf,
            relaxation_time: lambda,
            power_index: n,
            color: String::new(),
        }
    }

    fn clean_curve(p: &ModelParams, count: usize) -> FlowCurve {
        let mut rng = StdRng::seed_from_u64(0);
        generate_flow_curve(p, count, &NoiseConfig::disabled(), &mut rng).unwrap()
    }

    fn pt(shear_rate: f64, viscosity: f64) -> RheologyPoint {
        RheologyPoint {
            shear_rate,
            viscosity,
            shear_stress: shear_rate * viscosity / 1000.0,
        }
    }

    #[test]
    fn tail_is_last_fifth_rounded_up() {
        let pts: Vec<_> = (1..=51).map(|i| pt(i as f64, 1.0)).collect();
        for (n, expected) in [(50usize, 10usize), (51, 11), (10, 2), (6, 2), (5, 1), (1, 1), (0, 0)] {
            assert_eq!(high_shear_tail(&pts[..n]).len(), expected, "n={n}");
            assert_eq!(tail_start(n), n - expected);
        }
    }

    #[test]
    fn recovers_power_index_from_clean_thinning_curve() {
        for (lambda, n) in [(2.5, 0.6), (1.0, 0.5), (0.5, 0.8)] {
            let curve = clean_curve(&params(45.0, 0.0, lambda, n), 50);
            let r = analyze_sample(&curve).unwrap();
            assert!((r.flow_behavior_index - n).abs() < 0.05, "n={n} got {}", r.flow_behavior_index);
            assert!(r.flow_behavior_index < 1.0);
            assert!(!r.is_newtonian);
        }
    }

    #[test]
    fn newtonian_curve_gives_unit_index() {
        let curve = clean_curve(&params(10.0, 2.0, 0.0, 0.5), 50);
        let r = analyze_sample(&curve).unwrap();
        assert_relative_eq!(r.flow_behavior_index, 1.0, epsilon = 1e-12);
        assert!(r.is_newtonian);
        assert_relative_eq!(r.cluster_length_scale, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn default_samples_rank_as_expected() {
        let samples = default_samples();
        let results: Vec<_> = samples
            .iter()
            .map(|p| analyze_sample(&clean_curve(p, 50)).unwrap())
            .collect();
        let (a, c) = (&results[0], &results[2]);

        assert_eq!(a.sample_id, "sample-a");
        assert!(a.is_newtonian);

        // η∞ dominates the tail of sample C, so n̂ sits well above n = 0.6
        // but still reads as shear thinning.
        assert_eq!(c.sample_id, "sample-c");
        assert!(c.flow_behavior_index < 1.0 - NEWTONIAN_TOLERANCE);
        assert!(c.cluster_length_scale > 0.0);
        assert!(c.cluster_length_scale > a.cluster_length_scale);
    }

    #[test]
    fn cluster_scale_is_clamped_at_zero() {
        assert_eq!(cluster_length_scale(0.0, 1.5), 0.0);
        assert_relative_eq!(cluster_length_scale(2.5, 0.6), 45.0, epsilon = 1e-12);
    }

    #[test]
    fn results_are_consistent_on_noisy_curves() {
        let mut rng = StdRng::seed_from_u64(2024);
        for p in default_samples() {
            for _ in 0..20 {
                let curve = generate_flow_curve(&p, 50, &NoiseConfig::default(), &mut rng).unwrap();
                let r = analyze_sample(&curve).unwrap();
                assert_eq!(r.sample_id, p.id);
                assert!(r.cluster_length_scale >= 0.0);
                assert_eq!(r.is_newtonian, (r.flow_behavior_index - 1.0).abs() < 0.05);
                assert!(r.flow_behavior_index.is_finite());
            }
        }
    }

    #[test]
    fn short_curves_are_rejected() {
        let curve = clean_curve(&params(8.5, 4.0, 0.5, 0.85), 5);
        assert_eq!(
            analyze_sample(&curve),
            Err(CurveError::TailTooShort { total: 5, tail: 1 })
        );
        assert!(analyze_points(&params(1.0, 1.0, 0.0, 1.0), &[]).is_err());

        let curve = clean_curve(&params(8.5, 4.0, 0.5, 0.85), 6);
        assert!(analyze_sample(&curve).is_ok());
    }

    #[test]
    fn unsorted_tail_is_rejected() {
        let mut pts: Vec<_> = (1..=10).map(|i| pt(i as f64, 1.0)).collect();
        pts.swap(8, 9);
        assert!(matches!(
            analyze_points(&params(1.0, 1.0, 0.0, 1.0), &pts),
            Err(CurveError::NonIncreasingShearRate { index: 9, .. })
        ));
    }

    #[test]
    fn overflowed_viscosity_is_rejected() {
        let mut pts: Vec<_> = (1..=10).map(|i| pt(i as f64, 1.0)).collect();
        pts[9].viscosity = f64::INFINITY;
        assert!(matches!(
            analyze_points(&params(1.0, 1.0, 0.0, 1.0), &pts),
            Err(CurveError::NonPositiveValue { quantity: "viscosity", index: 9, .. })
        ));
    }
}
