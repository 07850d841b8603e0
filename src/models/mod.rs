//! Flow model implementations.
//!
//! Models are implemented as small, pure functions so that generation and
//! analysis code can stay generic.

pub mod carreau;

pub use carreau::*;
