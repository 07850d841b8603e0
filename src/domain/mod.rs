//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - model inputs (`ModelParams`) and generation settings
//! - curve points and the `(params, points)` bundle (`FlowCurve`)
//! - analysis outputs (`AnalysisResult`) and the saved curve file schema

pub mod types;

pub use types::*;
