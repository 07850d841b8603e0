//! Formatted terminal output: run summary, metrics table, tail diagnostics.

use crate::app::pipeline::{RunOutput, SampleRun};
use crate::domain::AnalysisResult;
use crate::fit::{TailDiagnostics, tail_start};
use crate::models::{MAX_SHEAR_RATE, MIN_SHEAR_RATE};

/// Header block: what was generated and how.
pub fn format_run_summary(output: &RunOutput) -> String {
    let s = &output.settings;
    let mut out = String::new();

    out.push_str("=== visco - Synthetic Flow Curve Analysis ===\n");
    out.push_str(&format!(
        "Samples: n={} | points/curve={} | seed={}\n",
        output.runs.len(),
        s.point_count,
        s.seed
    ));
    let noise = if s.noise.is_enabled() {
        format!("uniform, {:.1}% peak-to-peak", s.noise.amplitude * 100.0)
    } else {
        "off".to_string()
    };
    out.push_str(&format!("Noise: {noise}\n"));
    out.push_str(&format!(
        "Shear rate: [{MIN_SHEAR_RATE}, {MAX_SHEAR_RATE}] 1/s, log-spaced | tail: last {} point(s)\n",
        s.point_count - tail_start(s.point_count)
    ));
    out.push('\n');

    out
}

/// Per-sample metrics table.
pub fn format_metrics(runs: &[SampleRun]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<4} {:<28} {:>8} {:>8} {:>7} {:>6} {:>7} {:>8} {:<15}\n",
            "id", "name", "eta0", "eta_inf", "lambda", "n", "n_hat", "cluster", "behavior"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<4} {:-<28} {:-<8} {:-<8} {:-<7} {:-<6} {:-<7} {:-<8} {:-<15}\n",
            "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in runs {
        let p = &r.curve.params;
        let a = &r.analysis;
        out.push_str(
            format!(
                "{:<4} {:<28} {:>8.2} {:>8.2} {:>7.2} {:>6.2} {:>7.3} {:>8.1} {:<15}\n",
                truncate(&p.short_label(), 4),
                truncate(&p.name, 28),
                p.zero_shear_viscosity,
                p.infinite_shear_viscosity,
                p.relaxation_time,
                p.power_index,
                a.flow_behavior_index,
                a.cluster_length_scale,
                behavior_label(a),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Tail diagnostics, one block per sample.
pub fn format_diagnostics(diags: &[TailDiagnostics]) -> String {
    let mut out = String::new();
    out.push_str("Tail diagnostics (pairwise mean vs least squares):\n");
    for d in diags {
        out.push_str(&format!(
            "- {}: points {}..{} | shear=[{:.1}, {:.1}] 1/s\n",
            d.sample_id,
            d.tail_start,
            d.tail_start + d.tail_len - 1,
            d.shear_range.0,
            d.shear_range.1
        ));
        out.push_str(&format!(
            "    mean slope={:.5} | lsq slope={} | r2={} | max noise={:.2}% | clamped={}\n",
            d.mean_slope,
            fmt_opt(d.regression_slope, 5),
            fmt_opt(d.regression_r_squared, 4),
            d.max_noise_deviation * 100.0,
            d.clamped_points
        ));
        out.push_str(&format!("    slopes: {}\n", fmt_vec(&d.pairwise_slopes)));
    }
    out
}

/// `Newtonian`, `shear-thinning`, or `shear-thickening`.
pub fn behavior_label(a: &AnalysisResult) -> &'static str {
    if a.is_newtonian {
        "Newtonian"
    } else if a.flow_behavior_index < 1.0 {
        "shear-thinning"
    } else {
        "shear-thickening"
    }
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.decimals$}"),
        _ => "-".to_string(),
    }
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.4}")).collect();
    format!("[{}]", parts.join(", "))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_batch;
    use crate::data::default_samples;
    use crate::domain::{GenerationSettings, NoiseConfig};
    use crate::fit::tail_diagnostics;

    fn clean_run() -> RunOutput {
        let settings = GenerationSettings {
            noise: NoiseConfig::disabled(),
            seed: 1,
            ..GenerationSettings::default()
        };
        run_batch(&default_samples(), &settings).unwrap()
    }

    #[test]
    fn summary_reports_settings() {
        let txt = format_run_summary(&clean_run());
        assert!(txt.contains("Samples: n=3 | points/curve=50 | seed=1"));
        assert!(txt.contains("Noise: off"));
        assert!(txt.contains("tail: last 10 point(s)"));
    }

    #[test]
    fn metrics_table_lists_every_sample() {
        let out = clean_run();
        let txt = format_metrics(&out.runs);
        let lines: Vec<_> = txt.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("id   name"));
        assert!(lines[2].starts_with("A    Sample A (Buffer)"));
        assert!(lines[2].ends_with("Newtonian"));
        assert!(lines[4].starts_with("C    Sample C (mAb 150mg/mL + Cl."));
        assert!(lines[4].ends_with("shear-thinning"));
    }

    #[test]
    fn diagnostics_block_per_sample() {
        let out = clean_run();
        let diags: Vec<_> = out.runs.iter().map(|r| tail_diagnostics(&r.curve).unwrap()).collect();
        let txt = format_diagnostics(&diags);
        assert!(txt.contains("- sample-a: points 40..49"));
        assert_eq!(txt.matches("slopes: [").count(), 3);
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("abc", 4), "abc");
        assert_eq!(truncate("abcdef", 4), "abc.");
    }
}
