//! Feature Assembly
//!
//! Builds the 6-dimensional model input from simulated weather, growth stage
//! and the crop's water-need coefficient, in fixed order:
//!
//! `[temperature, humidity, rainfall, sunlight, growth_stage, crop_water_need]`

use serde::{Deserialize, Serialize};

use crate::crops::water_need_for;
use crate::growth::estimate_growth_stage;
use crate::timestamp::RequestTime;
use crate::weather::{SimulatedWeather, WeatherSample, WeatherSource};

/// Number of model input features
pub const FEATURE_COUNT: usize = 6;

/// Model input, single sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f32; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f32; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f32; FEATURE_COUNT] {
        &self.0
    }
}

/// Human-readable inputs behind a feature vector (display / export)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureContext {
    #[serde(flatten)]
    pub weather: WeatherSample,
    pub growth_stage: f64,
    pub crop_water_need: f64,
}

impl FeatureContext {
    /// Feature vector in model order
    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector([
            self.weather.temperature as f32,
            self.weather.humidity as f32,
            self.weather.rainfall as f32,
            self.weather.sunlight as f32,
            self.growth_stage as f32,
            self.crop_water_need as f32,
        ])
    }
}

/// Build features using an explicit weather source
///
/// `crop` is the normalized crop key; unknown keys fall back to a full-year
/// window and a 0.6 water need.
pub fn build_features<W: WeatherSource + ?Sized>(
    weather_source: &W,
    crop: &str,
    location: &str,
    time: &RequestTime,
    weather_seed: Option<u64>,
) -> (FeatureVector, FeatureContext) {
    let weather = weather_source.sample(location, weather_seed);
    let context = FeatureContext {
        weather,
        growth_stage: estimate_growth_stage(crop, time.month()),
        crop_water_need: water_need_for(crop),
    };
    let features = context.to_vector();

    tracing::debug!(crop, location, features = ?features.as_array(), "Built feature vector");
    (features, context)
}

/// Build features with the deterministic weather simulator
pub fn build_feature_vector(
    crop: &str,
    location: &str,
    time: &RequestTime,
) -> (FeatureVector, FeatureContext) {
    build_features(&SimulatedWeather, crop, location, time, None)
}
