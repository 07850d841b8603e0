//! `visco-curves` library crate.
//!
//! The binary (`visco`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - generation and analysis are reusable outside the CLI/TUI front-ends
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
