//! Sample sources: built-in presets and the synthetic curve generator.

pub mod generator;
pub mod presets;

pub use generator::{generate_flow_curve, generate_seeded, sample_seed};
pub use presets::default_samples;
