//! Reporting: terminal tables and the optional AI insight.

pub mod format;
pub mod insight;

pub use format::*;
pub use insight::InsightClient;
