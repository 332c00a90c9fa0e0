//! AgroMind Advisory Core
//!
//! Irrigation and fertilization advice from a crop, a location and an
//! optional date.
//!
//! Pipeline (leaves first):
//! - `weather`: deterministic pseudo-weather keyed by location
//! - `growth`: calendar month -> normalized growth stage
//! - `features`: 6-float model input + display context
//! - `inference`: fixed-weight 6 -> 8 -> 2 network, compiled once per process
//! - `advice`: score thresholds and advisory text
//! - `recommend`: the single request/response entry point
//!
//! Every step except engine initialization is a pure function of its inputs,
//! so `recommend` is safe to call from any thread.

pub mod advice;
pub mod config;
pub mod crops;
pub mod error;
pub mod features;
pub mod growth;
pub mod inference;
pub mod recommend;
pub mod report;
pub mod timestamp;
pub mod utils;
pub mod weather;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use advice::{label_score, AdvisoryLevel, ModelScores};
pub use config::{AdvisorConfig, Language};
pub use crops::CropKey;
pub use error::{AgroMindError, InferenceError};
pub use features::{build_feature_vector, FeatureContext, FeatureVector};
pub use growth::estimate_growth_stage;
pub use inference::{ExecutionPath, InferenceEngine, ScorePair};
pub use recommend::{
    recommend, Recommendation, RecommendationResponse, RecommendationService, RecommendRequest,
};
pub use timestamp::{resolve_timestamp, RequestTime, TimestampSource};
pub use weather::{simulate_weather, WeatherSample, WeatherSource};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
