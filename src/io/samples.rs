//! TOML sample files.
//!
//! ```toml
//! [[sample]]
//! id = "sample-a"
//! name = "Sample A (Buffer)"
//! zero_shear_viscosity = 1.2
//! infinite_shear_viscosity = 1.0
//! relaxation_time = 0.01
//! power_index = 0.98
//! color = "#94a3b8"
//! ```
//!
//! The generator trusts its inputs, so range checks happen here, at load time.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::ModelParams;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SampleFile {
    #[serde(rename = "sample", default)]
    samples: Vec<ModelParams>,
}

/// Read and validate a sample file.
pub fn load_samples(path: &Path) -> Result<Vec<ModelParams>, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read sample file '{}': {e}", path.display())))?;
    let samples = parse_samples(&text)
        .map_err(|e| AppError::new(2, format!("Invalid sample file '{}': {e}", path.display())))?;
    info!(path = %path.display(), count = samples.len(), "loaded samples");
    Ok(samples)
}

/// Parse and validate sample TOML.
pub fn parse_samples(text: &str) -> Result<Vec<ModelParams>, AppError> {
    let file: SampleFile = toml::from_str(text).map_err(|e| AppError::new(2, e.to_string()))?;
    if file.samples.is_empty() {
        return Err(AppError::new(2, "no [[sample]] entries"));
    }

    let mut seen = HashSet::new();
    for p in &file.samples {
        if !seen.insert(p.id.as_str()) {
            return Err(AppError::new(2, format!("duplicate sample id '{}'", p.id)));
        }
        validate_params(p)?;
    }
    debug!(count = file.samples.len(), "parsed sample TOML");
    Ok(file.samples)
}

/// Write samples as TOML.
pub fn write_samples(path: &Path, samples: &[ModelParams]) -> Result<(), AppError> {
    let file = SampleFile {
        samples: samples.to_vec(),
    };
    let text = toml::to_string_pretty(&file)
        .map_err(|e| AppError::new(4, format!("Failed to encode samples: {e}")))?;
    fs::write(path, text)
        .map_err(|e| AppError::new(2, format!("Failed to write sample file '{}': {e}", path.display())))?;
    Ok(())
}

/// Range checks for user-supplied parameters.
///
/// `η₀ > 0`, `0 ≤ η∞ ≤ η₀`, `λ ≥ 0`, `n > 0`, all finite, non-empty id.
pub fn validate_params(p: &ModelParams) -> Result<(), AppError> {
    let fail = |msg: String| Err(AppError::new(2, format!("sample '{}': {msg}", p.id)));

    if p.id.trim().is_empty() {
        return Err(AppError::new(2, "sample id must not be empty"));
    }
    let fields = [
        ("zero_shear_viscosity", p.zero_shear_viscosity),
        ("infinite_shear_viscosity", p.infinite_shear_viscosity),
        ("relaxation_time", p.relaxation_time),
        ("power_index", p.power_index),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return fail(format!("{name} must be finite, got {value}"));
        }
    }
    if p.zero_shear_viscosity <= 0.0 {
        return fail(format!("zero_shear_viscosity must be > 0, got {}", p.zero_shear_viscosity));
    }
    if p.infinite_shear_viscosity < 0.0 || p.infinite_shear_viscosity > p.zero_shear_viscosity {
        return fail(format!(
            "infinite_shear_viscosity must lie in [0, {}], got {}",
            p.zero_shear_viscosity, p.infinite_shear_viscosity
        ));
    }
    if p.relaxation_time < 0.0 {
        return fail(format!("relaxation_time must be >= 0, got {}", p.relaxation_time));
    }
    if p.power_index <= 0.0 {
        return fail(format!("power_index must be > 0, got {}", p.power_index));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_samples;

    const ONE: &str = r##"
[[sample]]
id = "sample-x"
name = "X"
zero_shear_viscosity = 10.0
infinite_shear_viscosity = 2.0
relaxation_time = 0.3
power_index = 0.7
"##;

    #[test]
    fn parses_minimal_file() {
        let samples = parse_samples(ONE).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].id, "sample-x");
        assert_eq!(samples[0].power_index, 0.7);
        assert!(samples[0].color.is_empty());
    }

    #[test]
    fn rejects_duplicates_and_bad_ranges() {
        let dup = format!("{ONE}{ONE}");
        let err = parse_samples(&dup).unwrap_err();
        assert!(err.message().contains("duplicate"));

        let inverted = ONE.replace("infinite_shear_viscosity = 2.0", "infinite_shear_viscosity = 20.0");
        assert!(parse_samples(&inverted).is_err());

        let negative = ONE.replace("relaxation_time = 0.3", "relaxation_time = -1.0");
        assert!(parse_samples(&negative).is_err());

        assert!(parse_samples("").is_err());
        assert!(parse_samples("[[sample]]\nid = \"a\"").is_err());
    }

    #[test]
    fn write_then_load_presets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.toml");
        write_samples(&path, &default_samples()).unwrap();
        let loaded = load_samples(&path).unwrap();
        assert_eq!(loaded, default_samples());
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = load_samples(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
