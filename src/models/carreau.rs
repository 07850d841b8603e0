//! Carreau-type viscosity model.
//!
//! ```text
//! η(γ̇) = η∞ + (η₀ − η∞) · [1 + (λ·γ̇)²]^((n−1)/2)
//! ```
//!
//! Limits the generator relies on:
//! - `γ̇ → 0`: the bracket tends to 1, so `η → η₀`.
//! - `γ̇ → ∞` with `n < 1`: the bracket power tends to 0, so `η → η∞`.
//! - `λ = 0` or `n = 1`: `η = η₀` everywhere (Newtonian).

use crate::domain::ModelParams;

/// Lowest sampled shear rate (s⁻¹).
pub const MIN_SHEAR_RATE: f64 = 0.1;

/// Highest sampled shear rate (s⁻¹).
pub const MAX_SHEAR_RATE: f64 = 1000.0;

/// Floor applied to every generated viscosity; keeps `log10(η)` defined downstream.
pub const MIN_VISCOSITY: f64 = 0.1;

/// Divisor turning `γ̇·η` into the reported shear stress.
///
/// Calibration constant (cP-ish viscosity to a Pa-ish stress), not a derived
/// unit conversion. Kept for compatibility with previously exported curves.
pub const STRESS_SCALE: f64 = 1000.0;

/// Noise-free model viscosity at `shear_rate`.
///
/// No input validation: out-of-range parameters still evaluate.
pub fn carreau_viscosity(params: &ModelParams, shear_rate: f64) -> f64 {
    let base = 1.0 + (params.relaxation_time * shear_rate).powi(2);
    let exponent = (params.power_index - 1.0) / 2.0;
    params.infinite_shear_viscosity
        + (params.zero_shear_viscosity - params.infinite_shear_viscosity) * base.powf(exponent)
}

/// Shear stress reported alongside a viscosity sample.
pub fn shear_stress(shear_rate: f64, viscosity: f64) -> f64 {
    shear_rate * viscosity / STRESS_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(eta0: f64, eta_inf: f64, lambda: f64, n: f64) -> ModelParams {
        ModelParams {
            id: "t".to_string(),
            name: "t".to_string(),
            zero_shear_viscosity: eta0,
            infinite_shear_viscosity: eta_inf,
            relaxation_time: lambda,
            power_index: n,
            color: String::new(),
        }
    }

    #[test]
    fn zero_shear_limit_is_eta0() {
        let p = params(45.0, 12.0, 2.5, 0.6);
        assert_relative_eq!(carreau_viscosity(&p, 0.0), 45.0);
        assert_relative_eq!(carreau_viscosity(&p, 1e-9), 45.0, max_relative = 1e-12);
    }

    #[test]
    fn high_shear_limit_approaches_eta_inf() {
        let p = params(45.0, 12.0, 2.5, 0.6);
        let eta = carreau_viscosity(&p, 1e12);
        assert!((eta - 12.0).abs() < 1e-3, "expected ~12, got {eta}");
    }

    #[test]
    fn newtonian_cases_are_flat() {
        for p in [params(8.5, 4.0, 0.0, 0.6), params(8.5, 4.0, 3.0, 1.0)] {
            for &g in &[0.1, 1.0, 10.0, 1000.0] {
                assert_relative_eq!(carreau_viscosity(&p, g), 8.5, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn viscosity_decreases_when_thinning() {
        let p = params(8.5, 4.0, 0.5, 0.85);
        let lo = carreau_viscosity(&p, 0.1);
        let hi = carreau_viscosity(&p, 1000.0);
        assert!(hi < lo);
        assert!(hi > 4.0);
    }

    #[test]
    fn stress_uses_fixed_scale() {
        assert_relative_eq!(shear_stress(100.0, 20.0), 2.0);
    }
}
