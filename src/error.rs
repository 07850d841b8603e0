//! Error types.
//!
//! - `CurveError`: precondition violations raised by the numeric core
//!   (generation + analysis). These are plain values with no I/O context.
//! - `AppError`: what the binary reports. Carries a process exit code:
//!   `2` user/config input, `3` domain precondition, `4` runtime/external.

use thiserror::Error;

/// Domain errors raised by curve generation and analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("point count must be at least {minimum}, got {requested}")]
    TooFewPoints { requested: usize, minimum: usize },

    #[error("invalid shear-rate range [{min}, {max}] (must be finite, >0, and max>min)")]
    InvalidShearRange { min: f64, max: f64 },

    #[error("noise amplitude must be finite and >= 0, got {0}")]
    InvalidNoiseAmplitude(f64),

    #[error(
        "high-shear tail of a {total}-point curve holds {tail} point(s); slope estimation needs at least 2 (use 6 or more points)"
    )]
    TailTooShort { total: usize, tail: usize },

    #[error("shear rate must increase strictly along the curve (index {index}: {previous} -> {current})")]
    NonIncreasingShearRate {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("{quantity} at index {index} must be finite and positive, got {value}")]
    NonPositiveValue {
        quantity: &'static str,
        index: usize,
        value: f64,
    },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<CurveError> for AppError {
    fn from(err: CurveError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
