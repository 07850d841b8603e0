//! Synthetic flow-curve generation from Carreau model parameters.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::prelude::*;
use rand_distr::Uniform;

use crate::domain::{FlowCurve, ModelParams, NoiseConfig, RheologyPoint};
use crate::error::CurveError;
use crate::math::log10_space;
use crate::models::{MAX_SHEAR_RATE, MIN_SHEAR_RATE, MIN_VISCOSITY, carreau_viscosity, shear_stress};

/// Generate one flow curve.
///
/// Shear rates are log-spaced over `[MIN_SHEAR_RATE, MAX_SHEAR_RATE]`. Each
/// viscosity is the Carreau value plus `u·η·amplitude` with
/// `u ~ Uniform[-0.5, 0.5)`, floored at `MIN_VISCOSITY`. With noise disabled no
/// values are drawn from `rng`.
///
/// Model parameters are not validated; only degenerate sizes and a bad noise
/// amplitude are rejected.
pub fn generate_flow_curve<R: Rng + ?Sized>(
    params: &ModelParams,
    point_count: usize,
    noise: &NoiseConfig,
    rng: &mut R,
) -> Result<FlowCurve, CurveError> {
    if point_count < 2 {
        return Err(CurveError::TooFewPoints {
            requested: point_count,
            minimum: 2,
        });
    }
    if !(noise.amplitude.is_finite() && noise.amplitude >= 0.0) {
        return Err(CurveError::InvalidNoiseAmplitude(noise.amplitude));
    }

    let shear_rates = log10_space(MIN_SHEAR_RATE, MAX_SHEAR_RATE, point_count)?;
    let draw = Uniform::new(-0.5, 0.5);

    let mut points = Vec::with_capacity(point_count);
    for shear_rate in shear_rates {
        let model = carreau_viscosity(params, shear_rate);
        let jitter = if noise.is_enabled() {
            draw.sample(rng) * model * noise.amplitude
        } else {
            0.0
        };
        let viscosity = (model + jitter).max(MIN_VISCOSITY);

        points.push(RheologyPoint {
            shear_rate,
            viscosity,
            shear_stress: shear_stress(shear_rate, viscosity),
        });
    }

    Ok(FlowCurve {
        params: params.clone(),
        points,
    })
}

/// Generate with a dedicated `StdRng` seeded from `sample_seed(base_seed, params)`.
pub fn generate_seeded(
    params: &ModelParams,
    point_count: usize,
    noise: &NoiseConfig,
    base_seed: u64,
) -> Result<FlowCurve, CurveError> {
    let mut rng = StdRng::seed_from_u64(sample_seed(base_seed, params));
    generate_flow_curve(params, point_count, noise, &mut rng)
}

/// Per-sample seed derived from the run seed and every model input.
///
/// Changing any parameter yields a fresh noise stream; samples never share RNG
/// state, so parallel generation stays reproducible.
pub fn sample_seed(base_seed: u64, params: &ModelParams) -> u64 {
    let mut hasher = DefaultHasher::new();
    base_seed.hash(&mut hasher);
    params.id.hash(&mut hasher);
    params.zero_shear_viscosity.to_bits().hash(&mut hasher);
    params.infinite_shear_viscosity.to_bits().hash(&mut hasher);
    params.relaxation_time.to_bits().hash(&mut hasher);
    params.power_index.to_bits().hash(&mut hasher);
    hasher.finish()
}
