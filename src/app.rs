//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs logging
//! - loads sample parameters (TOML file or built-in presets)
//! - generates and analyzes flow curves
//! - prints reports/plots
//! - writes optional exports

use std::path::Path;

use clap::Parser;
use tracing::{info, warn};

use crate::cli::{Command, GenerateArgs, InitArgs, PlotArgs, RunArgs};
use crate::domain::{GenerationSettings, ModelParams, NoiseConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `visco` binary.
pub fn run() -> Result<(), AppError> {
    // `visco` and `visco --seed 3` behave like `visco tui ...`. Clap requires a
    // subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let stderr_logs = !matches!(cli.command, Command::Tui(_));
    crate::logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref(), stderr_logs)?;

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Metrics(args) => handle_metrics(args, OutputMode::MetricsOnly),
        Command::Insight(args) => handle_metrics(args, OutputMode::WithInsight),
        Command::Plot(args) => handle_plot(args),
        Command::Init(args) => handle_init(args),
        Command::Tui(args) => handle_tui(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    MetricsOnly,
    WithInsight,
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let (samples, settings) = prepare(&args.generate)?;
    let output = pipeline::run_batch(&samples, &settings)?;

    print!("{}", crate::report::format_run_summary(&output));
    println!("{}", crate::report::format_metrics(&output.runs));

    if !args.no_plot {
        let series: Vec<_> = output
            .runs
            .iter()
            .enumerate()
            .map(|(i, r)| crate::plot::PlotSeries::from_curve(&r.curve.params, &r.curve.points, i))
            .collect();
        let plot =
            crate::plot::render_flow_plot(&series, args.scale, args.generate.width, args.generate.height);
        println!("{plot}");
    }

    if args.diagnostics {
        let diags = output
            .runs
            .iter()
            .map(|r| crate::fit::tail_diagnostics(&r.curve))
            .collect::<Result<Vec<_>, _>>()?;
        println!("{}", crate::report::format_diagnostics(&diags));
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::write_results_csv(path, &output.runs)?;
    }
    if let Some(path) = &args.export_points {
        crate::io::write_points_csv(path, &output.runs)?;
    }
    if let Some(path) = &args.export_curves {
        crate::io::write_curve_json(path, &output)?;
    }

    Ok(())
}

fn handle_metrics(args: GenerateArgs, mode: OutputMode) -> Result<(), AppError> {
    let (samples, settings) = prepare(&args)?;
    if args.seed.is_none() {
        eprintln!("seed: {}", settings.seed);
    }
    let output = pipeline::run_batch(&samples, &settings)?;

    print!("{}", crate::report::format_metrics(&output.runs));

    if mode == OutputMode::WithInsight {
        // Advisory only: a failed request is shown, never turned into a failed run.
        let insight = crate::report::InsightClient::from_env().and_then(|c| c.summarize(&output.results()));
        match insight {
            Ok(text) => println!("\nAI Rheologist Insight:\n{text}"),
            Err(err) => {
                warn!(error = %err, "insight unavailable");
                eprintln!("\nInsight unavailable: {err}");
            }
        }
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::read_curve_json(&args.curves)?;
    let series = crate::plot::series_from_curve_file(&curve);
    let plot = crate::plot::render_flow_plot(&series, args.scale, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_init(args: InitArgs) -> Result<(), AppError> {
    if args.out.exists() && !args.force {
        return Err(AppError::new(
            2,
            format!("'{}' already exists (use --force to overwrite).", args.out.display()),
        ));
    }
    crate::io::write_samples(&args.out, &crate::data::default_samples())?;
    println!("Wrote sample presets to {}", args.out.display());
    Ok(())
}

fn handle_tui(args: GenerateArgs) -> Result<(), AppError> {
    let (samples, settings) = prepare(&args)?;
    crate::tui::run(samples, settings)
}

/// Samples plus generation settings for any generating command.
fn prepare(args: &GenerateArgs) -> Result<(Vec<ModelParams>, GenerationSettings), AppError> {
    let samples = load_samples_or_presets(args.samples.as_deref())?;
    let settings = settings_from_args(args)?;
    Ok((samples, settings))
}

fn load_samples_or_presets(path: Option<&Path>) -> Result<Vec<ModelParams>, AppError> {
    match path {
        Some(path) => crate::io::load_samples(path),
        None => {
            info!("no --samples file given, using built-in presets");
            Ok(crate::data::default_samples())
        }
    }
}

pub fn settings_from_args(args: &GenerateArgs) -> Result<GenerationSettings, AppError> {
    let noise = if args.no_noise {
        NoiseConfig::disabled()
    } else {
        if !(args.noise.is_finite() && args.noise >= 0.0) {
            return Err(AppError::new(
                2,
                format!("--noise must be a finite value >= 0, got {}.", args.noise),
            ));
        }
        NoiseConfig { amplitude: args.noise }
    };

    let seed = match args.seed {
        Some(seed) => seed,
        None => {
            let seed: u64 = rand::random();
            info!(seed, "no --seed given, drew a random one");
            seed
        }
    };

    Ok(GenerationSettings {
        point_count: args.points,
        noise,
        seed,
    })
}

const SUBCOMMANDS: [&str; 6] = ["run", "metrics", "insight", "plot", "init", "tui"];

/// Rewrite argv so `visco` defaults to `visco tui`.
///
/// Rules:
/// - `visco`                         -> `visco tui`
/// - `visco --seed 3 ...`            -> `visco tui --seed 3 ...`
/// - `visco -v run ...`              -> unchanged (global flag before a subcommand)
/// - `visco --help/--version/-h`     -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if argv.iter().skip(1).any(|a| SUBCOMMANDS.contains(&a.as_str())) {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is and let clap report the unknown subcommand.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn generate_args(extra: &[&str]) -> GenerateArgs {
        let mut full = vec!["visco", "metrics"];
        full.extend_from_slice(extra);
        match crate::cli::Cli::parse_from(full).command {
            Command::Metrics(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["visco"])), argv(&["visco", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["visco", "--seed", "3"])),
            argv(&["visco", "tui", "--seed", "3"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_untouched() {
        for case in [
            &["visco", "run", "--no-noise"][..],
            &["visco", "-v", "metrics"][..],
            &["visco", "--help"][..],
            &["visco", "bogus"][..],
        ] {
            assert_eq!(rewrite_args(argv(case)), argv(case));
        }
    }

    #[test]
    fn settings_follow_flags() {
        let s = settings_from_args(&generate_args(&["--seed", "11", "--points", "30", "--noise", "0.1"])).unwrap();
        assert_eq!(s.seed, 11);
        assert_eq!(s.point_count, 30);
        assert!((s.noise.amplitude - 0.1).abs() < 1e-12);

        let s = settings_from_args(&generate_args(&["--seed", "11", "--no-noise"])).unwrap();
        assert!(!s.noise.is_enabled());
    }

    #[test]
    fn negative_noise_is_a_usage_error() {
        let err = settings_from_args(&generate_args(&["--noise=-0.5"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn presets_used_without_sample_file() {
        assert_eq!(load_samples_or_presets(None).unwrap().len(), 3);
        assert_eq!(
            load_samples_or_presets(Some(Path::new("/nonexistent/samples.toml")))
                .unwrap_err()
                .exit_code(),
            2
        );
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("samples.toml");
        handle_init(InitArgs {
            out: out.clone(),
            force: false,
        })
        .unwrap();
        assert_eq!(crate::io::load_samples(&out).unwrap(), crate::data::default_samples());

        let err = handle_init(InitArgs { out, force: false }).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
