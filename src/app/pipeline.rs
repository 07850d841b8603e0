//! Shared "generate + analyze" pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! params -> seeded generation -> analysis
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use rayon::prelude::*;
use tracing::{debug, info};

use crate::data::generate_seeded;
use crate::domain::{AnalysisResult, FlowCurve, GenerationSettings, ModelParams};
use crate::error::{AppError, CurveError};
use crate::fit::analyze_sample;

/// One sample's curve and its analysis.
#[derive(Debug, Clone)]
pub struct SampleRun {
    pub curve: FlowCurve,
    pub analysis: AnalysisResult,
}

/// All computed outputs of a single run, in input order.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub settings: GenerationSettings,
    pub runs: Vec<SampleRun>,
}

impl RunOutput {
    pub fn results(&self) -> Vec<AnalysisResult> {
        self.runs.iter().map(|r| r.analysis.clone()).collect()
    }
}

/// Generate and analyze a single sample.
pub fn run_sample(params: &ModelParams, settings: &GenerationSettings) -> Result<SampleRun, CurveError> {
    let curve = generate_seeded(params, settings.point_count, &settings.noise, settings.seed)?;
    let analysis = analyze_sample(&curve)?;
    debug!(
        sample = %params.id,
        n_hat = analysis.flow_behavior_index,
        cluster = analysis.cluster_length_scale,
        "analyzed sample"
    );
    Ok(SampleRun { curve, analysis })
}

/// Generate and analyze every sample. Samples run in parallel; each one owns
/// its RNG, so output is independent of scheduling.
pub fn run_batch(samples: &[ModelParams], settings: &GenerationSettings) -> Result<RunOutput, AppError> {
    if samples.is_empty() {
        return Err(AppError::new(2, "No samples to analyze."));
    }

    info!(
        samples = samples.len(),
        points = settings.point_count,
        noise = settings.noise.amplitude,
        seed = settings.seed,
        "running batch"
    );

    let runs = samples
        .par_iter()
        .map(|p| run_sample(p, settings))
        .collect::<Result<Vec<_>, CurveError>>()?;

    Ok(RunOutput {
        settings: *settings,
        runs,
    })
}
