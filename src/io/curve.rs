//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a run:
//! - generation settings (point count, noise, seed)
//! - every sample's parameters, generated points and analysis
//!
//! The schema is defined by `domain::CurveFile`; `visco plot` re-renders it.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::app::pipeline::RunOutput;
use crate::domain::{CurveEntry, CurveFile};
use crate::error::AppError;

/// Build the serializable form of a run.
pub fn curve_file_from_run(output: &RunOutput) -> CurveFile {
    CurveFile {
        tool: "visco".to_string(),
        generated_at: Utc::now(),
        settings: output.settings,
        samples: output
            .runs
            .iter()
            .map(|r| CurveEntry {
                params: r.curve.params.clone(),
                points: r.curve.points.clone(),
                analysis: r.analysis.clone(),
            })
            .collect(),
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, output: &RunOutput) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    let curve = curve_file_from_run(output);
    serde_json::to_writer_pretty(BufWriter::new(file), &curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    info!(path = %path.display(), samples = curve.samples.len(), "wrote curve JSON");
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    if curve.samples.is_empty() {
        return Err(AppError::new(2, "Curve JSON holds no samples."));
    }
    Ok(curve)
}
