//! Command-line parsing for the synthetic viscometry toolkit.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the generation/analysis code.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{AxisScale, DEFAULT_NOISE_AMPLITUDE, DEFAULT_POINT_COUNT};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "visco",
    version,
    about = "Synthetic viscometry toolkit: Carreau flow curves, flow index and cluster metrics"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Silence all logging.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write logs to this file (the only log sink in the TUI).
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate and analyze every sample, print metrics and a plot, and optionally export.
    Run(RunArgs),
    /// Print the metrics table only (useful for scripting).
    Metrics(GenerateArgs),
    /// Print the metrics table followed by an AI-written interpretation (needs GEMINI_API_KEY).
    Insight(GenerateArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Write the built-in sample presets to a TOML file to start from.
    Init(InitArgs),
    /// Launch the interactive TUI.
    ///
    /// Same generation/analysis pipeline as `visco run`, rendered with Ratatui and
    /// with live parameter controls.
    Tui(GenerateArgs),
}

/// Options shared by every command that generates curves.
#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// TOML sample file (see `visco init`). Built-in presets when omitted.
    #[arg(short, long, value_name = "TOML")]
    pub samples: Option<PathBuf>,

    /// Points per flow curve.
    #[arg(short = 'n', long, default_value_t = DEFAULT_POINT_COUNT)]
    pub points: usize,

    /// Base random seed. A fresh one is drawn (and printed) when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Peak-to-peak multiplicative noise amplitude (0.02 = ±1 %).
    #[arg(long, default_value_t = DEFAULT_NOISE_AMPLITUDE)]
    pub noise: f64,

    /// Generate noise-free curves.
    #[arg(long)]
    pub no_noise: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for `visco run`.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub generate: GenerateArgs,

    /// Plot axes.
    #[arg(long, value_enum, default_value_t = AxisScale::Log)]
    pub scale: AxisScale,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Print high-shear tail diagnostics (pairwise vs least-squares slope).
    #[arg(long)]
    pub diagnostics: bool,

    /// Export per-sample results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export every generated point to CSV.
    #[arg(long = "export-points", value_name = "CSV")]
    pub export_points: Option<PathBuf>,

    /// Export params, points and analysis to JSON (re-plot with `visco plot`).
    #[arg(long = "export-curves", value_name = "JSON")]
    pub export_curves: Option<PathBuf>,
}

/// Options for plotting saved curves.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Curve JSON file produced by `visco run --export-curves`.
    #[arg(long, value_name = "JSON")]
    pub curves: PathBuf,

    /// Plot axes.
    #[arg(long, value_enum, default_value_t = AxisScale::Log)]
    pub scale: AxisScale,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for `visco init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Destination TOML file.
    #[arg(long, value_name = "TOML", default_value = "samples.toml")]
    pub out: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults() {
        let cli = Cli::parse_from(["visco", "run"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.generate.points, 50);
        assert_eq!(args.generate.seed, None);
        assert!((args.generate.noise - 0.02).abs() < 1e-12);
        assert_eq!(args.scale, AxisScale::Log);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["visco", "metrics", "-vv", "--seed", "7", "--no-noise"]);
        assert_eq!(cli.verbose, 2);
        let Command::Metrics(args) = cli.command else {
            panic!("expected metrics");
        };
        assert_eq!(args.seed, Some(7));
        assert!(args.no_noise);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["visco", "-q", "-v", "run"]).is_err());
    }
}
