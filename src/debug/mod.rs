//! Debug bundle writer for inspecting generated curves and the flow-index estimate.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::app::pipeline::RunOutput;
use crate::error::AppError;
use crate::fit::tail_diagnostics;
use crate::models::carreau_viscosity;

/// Write the bundle as `visco_debug_seed<seed>_<timestamp>.md` under `dir`.
pub fn write_debug_bundle(dir: &Path, output: &RunOutput) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("visco_debug_seed{}_{ts}.md", output.settings.seed));

    let body = render_debug_bundle(output)?;
    let mut file = File::create(&path).map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;
    file.write_all(body.as_bytes())
        .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;

    info!(path = %path.display(), "wrote debug bundle");
    Ok(path)
}

/// Markdown body of a debug bundle.
pub fn render_debug_bundle(output: &RunOutput) -> Result<String, AppError> {
    let s = &output.settings;
    let mut out = String::new();

    out.push_str("# visco debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- seed: {}\n", s.seed));
    out.push_str(&format!("- points_per_curve: {}\n", s.point_count));
    out.push_str(&format!("- noise_amplitude: {}\n", s.noise.amplitude));

    out.push_str("\n## Parameters\n");
    out.push_str("| id | name | eta0 | eta_inf | lambda | n |\n");
    out.push_str("| - | - | - | - | - | - |\n");
    for r in &output.runs {
        let p = &r.curve.params;
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            p.id, p.name, p.zero_shear_viscosity, p.infinite_shear_viscosity, p.relaxation_time, p.power_index
        ));
    }

    out.push_str("\n## Results\n");
    out.push_str("| id | n_hat | cluster_length_scale | newtonian |\n");
    out.push_str("| - | - | - | - |\n");
    for r in &output.runs {
        let a = &r.analysis;
        out.push_str(&format!(
            "| {} | {:.6} | {:.4} | {} |\n",
            a.sample_id, a.flow_behavior_index, a.cluster_length_scale, a.is_newtonian
        ));
    }

    for r in &output.runs {
        let d = tail_diagnostics(&r.curve)?;
        out.push_str(&format!("\n## Sample: {}\n", r.curve.params.id));
        out.push_str(&format!(
            "Tail: points {}..{} of {} ({:.3} to {:.3} 1/s)\n",
            d.tail_start,
            d.tail_start + d.tail_len - 1,
            r.curve.points.len(),
            d.shear_range.0,
            d.shear_range.1
        ));
        out.push_str(&format!("- pairwise slopes: {}\n", fmt_vec(&d.pairwise_slopes)));
        out.push_str(&format!("- mean slope: {:.6}\n", d.mean_slope));
        out.push_str(&format!(
            "- least-squares slope: {} (r2 {})\n",
            fmt_opt(d.regression_slope),
            fmt_opt(d.regression_r_squared)
        ));
        out.push_str(&format!(
            "- max noise deviation: {:.3}% | clamped points: {}\n",
            d.max_noise_deviation * 100.0,
            d.clamped_points
        ));

        out.push_str("\n### Points\n");
        out.push_str("| i | shear_rate | model_eta | eta | deviation_pct | stress |\n");
        out.push_str("| - | - | - | - | - | - |\n");
        for (i, p) in r.curve.points.iter().enumerate() {
            let model = carreau_viscosity(&r.curve.params, p.shear_rate);
            let dev = if model > 0.0 {
                (p.viscosity / model - 1.0) * 100.0
            } else {
                f64::NAN
            };
            out.push_str(&format!(
                "| {i} | {:.4} | {:.6} | {:.6} | {} | {:.6} |\n",
                p.shear_rate,
                model,
                p.viscosity,
                fmt_opt(Some(dev)),
                p.shear_stress
            ));
        }
    }

    Ok(out)
}

fn fmt_vec(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.3}"),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_batch;
    use crate::data::default_samples;
    use crate::domain::{GenerationSettings, NoiseConfig};

    fn output(noise: NoiseConfig) -> RunOutput {
        let settings = GenerationSettings {
            noise,
            seed: 21,
            ..GenerationSettings::default()
        };
        run_batch(&default_samples(), &settings).unwrap()
    }

    #[test]
    fn bundle_covers_every_sample() {
        let txt = render_debug_bundle(&output(NoiseConfig::default())).unwrap();
        assert!(txt.starts_with("# visco debug bundle\n"));
        assert!(txt.contains("- seed: 21\n"));
        for id in ["sample-a", "sample-b", "sample-c"] {
            assert!(txt.contains(&format!("\n## Sample: {id}\n")));
        }
        assert_eq!(txt.matches("### Points").count(), 3);
        // Last point row of each 50-point curve.
        assert_eq!(txt.lines().filter(|l| l.starts_with("| 49 |")).count(), 3);
    }

    #[test]
    fn noise_free_deviation_is_zero() {
        let txt = render_debug_bundle(&output(NoiseConfig::disabled())).unwrap();
        assert!(txt.contains("- max noise deviation: 0.000% | clamped points: 0\n"));
    }

    #[test]
    fn writes_into_requested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("debug");
        let path = write_debug_bundle(&target, &output(NoiseConfig::default())).unwrap();
        assert!(path.starts_with(&target));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("visco_debug_seed21_"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("## Results"));
    }
}
