//! Recommendation Service
//!
//! Orchestrates one request end to end:
//! validate crop → resolve timestamp → build features → forward pass →
//! interpret scores → assemble [`Recommendation`].
//!
//! An unsupported crop is returned as `AgroMindError::UnsupportedCrop` before
//! any weather is simulated. A malformed date silently becomes "now".

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::advice::ModelScores;
use crate::config::{AdvisorConfig, Language};
use crate::crops::CropKey;
use crate::error::AgroMindError;
use crate::features::{build_features, FeatureContext};
use crate::inference::{ExecutionPath, InferenceEngine};
use crate::timestamp::{resolve_timestamp, TimestampSource};
use crate::weather::{SimulatedWeather, WeatherSource};

/// One recommendation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub crop: String,
    pub location: String,
    /// ISO-8601 date or date-time; absent, empty or unparseable means now
    #[serde(default)]
    pub date: Option<String>,
    /// Fixed weather seed; normally derived from the location
    #[serde(default)]
    pub weather_seed: Option<u64>,
}

impl RecommendRequest {
    pub fn new(crop: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            crop: crop.into(),
            location: location.into(),
            ..Default::default()
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_weather_seed(mut self, seed: u64) -> Self {
        self.weather_seed = Some(seed);
        self
    }
}

/// Echo of the validated request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestEcho {
    pub crop: CropKey,
    pub location: String,
    /// ISO-8601, second precision
    pub date: String,
}

/// Successful recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub input: RequestEcho,
    pub context: FeatureContext,
    pub model_scores: ModelScores,
    #[serde(skip)]
    pub timestamp_source: TimestampSource,
    #[serde(skip)]
    pub execution_path: ExecutionPath,
}

/// Serializable outcome handed to callers: `{"ok": true, "input": ...}` or
/// `{"ok": false, "error": "..."}`
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub recommendation: Option<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecommendationResponse {
    pub fn from_result(result: Result<Recommendation, AgroMindError>, language: Language) -> Self {
        match result {
            Ok(recommendation) => Self {
                ok: true,
                recommendation: Some(recommendation),
                error: None,
            },
            Err(e) => Self {
                ok: false,
                recommendation: None,
                error: Some(localized_error(&e, language)),
            },
        }
    }
}

/// Error text in the advisory language
pub fn localized_error(error: &AgroMindError, language: Language) -> String {
    match (error, language) {
        (AgroMindError::UnsupportedCrop { crop, supported }, Language::ZhTw) => {
            format!("不支援的作物'{}'. 請使用其中之一: {}", crop, supported.join(", "))
        }
        _ => error.to_string(),
    }
}

/// The recommendation pipeline
#[derive(Debug, Clone)]
pub struct RecommendationService<W: WeatherSource = SimulatedWeather> {
    config: AdvisorConfig,
    weather: W,
}

impl Default for RecommendationService {
    fn default() -> Self {
        Self::new(AdvisorConfig::default())
    }
}

impl RecommendationService {
    pub fn new(config: AdvisorConfig) -> Self {
        Self::with_weather_source(config, SimulatedWeather)
    }
}

impl<W: WeatherSource> RecommendationService<W> {
    pub fn with_weather_source(config: AdvisorConfig, weather: W) -> Self {
        Self { config, weather }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Recommend for crop / location / optional date text
    pub fn recommend(
        &self,
        crop: &str,
        location: &str,
        date_text: Option<&str>,
    ) -> Result<Recommendation, AgroMindError> {
        let mut request = RecommendRequest::new(crop, location);
        request.date = date_text.map(str::to_string);
        self.recommend_request(&request)
    }

    /// Recommend for a full request
    pub fn recommend_request(&self, request: &RecommendRequest) -> Result<Recommendation, AgroMindError> {
        let crop = CropKey::parse(&request.crop).ok_or_else(|| AgroMindError::UnsupportedCrop {
            crop: request.crop.clone(),
            supported: CropKey::names(),
        })?;

        let resolved = resolve_timestamp(request.date.as_deref());

        let (features, context) = build_features(
            &self.weather,
            crop.as_str(),
            request.location.trim(),
            &resolved.time,
            request.weather_seed,
        );

        let engine = InferenceEngine::initialize()?;
        let outcome = engine.forward(&features)?;
        let model_scores = ModelScores::interpret(&outcome.scores, &self.config);

        tracing::debug!(
            crop = %crop,
            irrigation = model_scores.irrigation_score,
            fertilization = model_scores.fertilization_score,
            path = ?outcome.path,
            "Recommendation ready"
        );

        Ok(Recommendation {
            input: RequestEcho {
                crop,
                location: request.location.clone(),
                date: resolved.time.to_iso_seconds(),
            },
            context,
            model_scores,
            timestamp_source: resolved.source,
            execution_path: outcome.path,
        })
    }

    /// Evaluate independent requests in parallel, preserving order
    pub fn recommend_batch(
        &self,
        requests: &[RecommendRequest],
    ) -> Vec<Result<Recommendation, AgroMindError>> {
        requests
            .par_iter()
            .map(|request| self.recommend_request(request))
            .collect()
    }

    /// Run a request and wrap the outcome for serialization
    pub fn respond(&self, request: &RecommendRequest) -> RecommendationResponse {
        RecommendationResponse::from_result(self.recommend_request(request), self.config.language)
    }
}

/// Recommend with the default configuration
pub fn recommend(
    crop: &str,
    location: &str,
    date_text: Option<&str>,
) -> Result<Recommendation, AgroMindError> {
    RecommendationService::new(AdvisorConfig::default()).recommend(crop, location, date_text)
}
