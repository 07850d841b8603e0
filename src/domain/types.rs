//! Shared domain types.
//!
//! Everything here is serde-serializable: samples load from TOML, and runs are
//! exported to JSON/CSV and reloaded for plotting.

use serde::{Deserialize, Serialize};

/// Default number of points per generated flow curve.
pub const DEFAULT_POINT_COUNT: usize = 50;

/// Default peak-to-peak noise amplitude, as a fraction of the model viscosity.
pub const DEFAULT_NOISE_AMPLITUDE: f64 = 0.02;

/// Carreau-type model parameters for one sample.
///
/// The numeric core trusts these values. Range checks belong to whoever builds
/// them (see `io::samples::validate_params`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub id: String,
    pub name: String,
    /// η₀, viscosity plateau at vanishing shear.
    pub zero_shear_viscosity: f64,
    /// η∞, viscosity plateau at very high shear.
    pub infinite_shear_viscosity: f64,
    /// λ (s). Sets the onset of shear thinning; read as a cluster-size proxy.
    pub relaxation_time: f64,
    /// n, shear-thinning exponent (`n < 1` thins, `n = 1` is Newtonian).
    pub power_index: f64,
    /// Display color (`#rrggbb`). Presentation only.
    #[serde(default)]
    pub color: String,
}

impl ModelParams {
    /// Short label for tables: the last `-` separated segment, uppercased
    /// (`sample-c` -> `C`).
    pub fn short_label(&self) -> String {
        match self.id.rsplit_once('-') {
            Some((_, tail)) if !tail.is_empty() => tail.to_uppercase(),
            _ => self.id.clone(),
        }
    }
}

/// One sampled point on a flow curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RheologyPoint {
    /// γ̇ in s⁻¹.
    pub shear_rate: f64,
    /// η, same units as the model viscosities.
    pub viscosity: f64,
    /// τ = γ̇·η / 1000.
    pub shear_stress: f64,
}

/// A generated curve bundled with the parameters that produced it.
///
/// Analysis takes this bundle so a curve can't be paired with someone else's
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowCurve {
    pub params: ModelParams,
    pub points: Vec<RheologyPoint>,
}

impl FlowCurve {
    pub fn shear_rates(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.shear_rate)
    }

    pub fn viscosities(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.viscosity)
    }
}

/// Per-sample analysis output.
///
/// Serialized with camelCase keys: this is the shape handed to the insight
/// prompt, which refers to the fields by these names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub sample_id: String,
    /// n̂ = 1 + mean log-log slope over the high-shear tail.
    pub flow_behavior_index: f64,
    /// Synthetic metric, arbitrary units, never negative.
    pub cluster_length_scale: f64,
    pub is_newtonian: bool,
}

/// Multiplicative noise injected into generated viscosities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Peak-to-peak amplitude as a fraction of η (0.02 = ±1 %).
    pub amplitude: f64,
}

impl NoiseConfig {
    pub fn disabled() -> Self {
        Self { amplitude: 0.0 }
    }

    pub fn is_enabled(&self) -> bool {
        self.amplitude > 0.0
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            amplitude: DEFAULT_NOISE_AMPLITUDE,
        }
    }
}

/// Everything a batch run needs besides the samples themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub point_count: usize,
    pub noise: NoiseConfig,
    /// Base seed; each sample derives its own stream from it.
    pub seed: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            point_count: DEFAULT_POINT_COUNT,
            noise: NoiseConfig::default(),
            seed: 0,
        }
    }
}

/// Axis scaling for flow-curve plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    /// log10 on both axes (power-law regime shows as a straight line).
    Log,
    Linear,
}

impl AxisScale {
    pub fn toggle(self) -> Self {
        match self {
            AxisScale::Log => AxisScale::Linear,
            AxisScale::Linear => AxisScale::Log,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AxisScale::Log => "log-log",
            AxisScale::Linear => "linear",
        }
    }
}

/// One sample's entry in a saved curve file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveEntry {
    pub params: ModelParams,
    pub points: Vec<RheologyPoint>,
    pub analysis: AnalysisResult,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub settings: GenerationSettings,
    pub samples: Vec<CurveEntry>,
}
