//! Export per-sample results and raw curve points to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::app::pipeline::SampleRun;
use crate::error::AppError;

const RESULTS_HEADER: [&str; 9] = [
    "sample_id",
    "name",
    "zero_shear_viscosity",
    "infinite_shear_viscosity",
    "relaxation_time",
    "power_index",
    "flow_behavior_index",
    "cluster_length_scale",
    "is_newtonian",
];

const POINTS_HEADER: [&str; 5] = ["sample_id", "index", "shear_rate", "viscosity", "shear_stress"];

/// Write one row per sample: inputs followed by the analysis.
pub fn write_results_csv(path: &Path, runs: &[SampleRun]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create results CSV '{}': {e}", path.display())))?;
    write_results(file, runs).map_err(|e| AppError::new(2, format!("Failed to write results CSV: {e}")))?;
    info!(path = %path.display(), rows = runs.len(), "wrote results CSV");
    Ok(())
}

/// Write one row per curve point, all samples stacked.
pub fn write_points_csv(path: &Path, runs: &[SampleRun]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create points CSV '{}': {e}", path.display())))?;
    write_points(file, runs).map_err(|e| AppError::new(2, format!("Failed to write points CSV: {e}")))?;
    info!(path = %path.display(), "wrote points CSV");
    Ok(())
}

fn write_results<W: Write>(out: W, runs: &[SampleRun]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(RESULTS_HEADER)?;
    for r in runs {
        let p = &r.curve.params;
        let a = &r.analysis;
        writer.write_record([
            a.sample_id.clone(),
            p.name.clone(),
            p.zero_shear_viscosity.to_string(),
            p.infinite_shear_viscosity.to_string(),
            p.relaxation_time.to_string(),
            p.power_index.to_string(),
            format!("{:.6}", a.flow_behavior_index),
            format!("{:.6}", a.cluster_length_scale),
            a.is_newtonian.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_points<W: Write>(out: W, runs: &[SampleRun]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(POINTS_HEADER)?;
    for r in runs {
        let id = &r.curve.params.id;
        for (i, p) in r.curve.points.iter().enumerate() {
            writer.write_record([
                id.clone(),
                i.to_string(),
                format!("{:.10}", p.shear_rate),
                format!("{:.10}", p.viscosity),
                format!("{:.10}", p.shear_stress),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}
