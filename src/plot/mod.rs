//! Terminal plots of flow curves (linear and log-log).

pub mod ascii;

pub use ascii::*;
