//! Error Types
//!
//! Caller-visible failures of the recommendation pipeline. Timestamp parse
//! failures are absorbed (see `timestamp`) and never appear here.

use thiserror::Error;

/// Errors surfaced by `recommend`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgroMindError {
    /// Crop is not in the supported set (recoverable, returned as a value)
    #[error("Unsupported crop '{crop}'. Use one of: {}", .supported.join(", "))]
    UnsupportedCrop {
        crop: String,
        supported: Vec<&'static str>,
    },

    /// The network could not be prepared; no recommendation can be produced
    #[error("Inference engine initialization failed: {0}")]
    EngineInitialization(String),

    /// Both execution paths failed for one request
    #[error("Inference failed (primary: {primary}; fallback: {fallback})")]
    InferenceExecution { primary: String, fallback: String },
}

impl AgroMindError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AgroMindError::UnsupportedCrop { .. })
    }
}

/// Failure of a single forward-pass execution path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Feature {index} is not finite ({value})")]
    NonFiniteInput { index: usize, value: f32 },

    #[error("Output unit {index} is not finite")]
    NonFiniteOutput { index: usize },

    #[error("Execution backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_crop_lists_options() {
        let err = AgroMindError::UnsupportedCrop {
            crop: "barley".to_string(),
            supported: vec!["rice", "corn"],
        };
        assert_eq!(err.to_string(), "Unsupported crop 'barley'. Use one of: rice, corn");
        assert!(err.is_validation());
    }

    #[test]
    fn test_engine_errors_are_not_validation() {
        assert!(!AgroMindError::EngineInitialization("x".into()).is_validation());
        assert!(!AgroMindError::InferenceExecution {
            primary: "a".into(),
            fallback: "b".into()
        }
        .is_validation());
    }
}
