//! Input/output helpers.
//!
//! - TOML sample files + parameter validation (`samples`)
//! - result/point exports (CSV) (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod samples;

pub use curve::*;
pub use export::*;
pub use samples::*;
