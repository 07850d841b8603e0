//! Mathematical utilities: log spacing, log-log slopes, least squares.

pub mod ols;
pub mod slope;
pub mod spacing;

pub use ols::*;
pub use slope::*;
pub use spacing::*;
