//! `tracing` subscriber setup for the `visco` binary.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

use crate::error::AppError;

/// `-q` wins over `-v`; each `-v` raises the level one step from WARN.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber.
///
/// `stderr` is false for the TUI, whose screen would be garbled by log lines;
/// a `log_file` still records everything at the chosen level.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>, stderr: bool) -> Result<(), AppError> {
    let stderr_layer = stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
            .compact()
    });

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| AppError::new(2, format!("Failed to create log file '{}': {e}", path.display())))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_thread_ids(true)
                    .with_target(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info, warn};

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::OFF);
    }

    #[test]
    fn file_layer_respects_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visco.log");
        let file = File::create(&path).unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(level_filter(1, false))
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false));

        tracing::subscriber::with_default(subscriber, || {
            warn!("tail too short");
            info!(seed = 42, "running batch");
            debug!("hidden at INFO");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("tail too short"));
        assert!(content.contains("seed=42"));
        assert!(!content.contains("hidden at INFO"));
    }

    #[test]
    fn unwritable_log_file_is_a_config_error() {
        if cfg!(unix) {
            let err = setup_logging(0, false, Some(Path::new("/")), false).unwrap_err();
            assert_eq!(err.exit_code(), 2);
        }
    }
}
