//! Utility modules
//!
//! Shared helpers used across the recommendation pipeline:
//! - Numeric: rounding and unit-interval clamping
//! - Logging: tracing subscriber set-up for the binaries

pub mod logging;
pub mod numeric;

// Re-export commonly used helpers
pub use logging::init_logging;
pub use numeric::{clamp01, round_to};
