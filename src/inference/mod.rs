//! Fixed-weight advisory network
//!
//! - `weights`: literal layer constants
//! - `engine`: execution paths, retry policy and the process-wide engine

pub mod engine;
pub mod weights;

pub use engine::{
    CompiledNetwork, ExecutionPath, ForwardPass, InferRequest, InferenceEngine,
    InferenceOutcome, RequestScopedExecutor, ScorePair,
};
pub use weights::NetworkWeights;
