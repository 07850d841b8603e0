//! Curve analysis.
//!
//! Responsibilities:
//!
//! - estimate the flow behavior index from the high-shear tail
//! - derive the cluster length scale and Newtonian flag
//! - tail diagnostics (pairwise slopes vs least squares) for debugging

pub mod analyzer;
pub mod diagnostics;

pub use analyzer::*;
pub use diagnostics::*;
