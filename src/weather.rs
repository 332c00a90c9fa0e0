//! Weather Simulation
//!
//! Deterministic pseudo-weather keyed by location text. No real meteorological
//! data is ingested: a location hashes to a seed, and the seed drives a
//! reproducible generator.
//!
//! Draw order and distributions (fixed):
//! 1. temperature  ~ Uniform[16, 34] °C
//! 2. humidity     ~ Uniform[45, 95] %
//! 3. rainfall     = max(0, Normal(mean = 5, sd = 10)) mm
//! 4. sunlight     ~ Uniform[2, 10] h
//!
//! All four values are rounded to 2 decimal places.

use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::utils::round_to;

/// Seeds derived from location text are reduced into [0, 2^31)
pub const SEED_MODULUS: u64 = 1 << 31;

pub const TEMPERATURE_RANGE: (f64, f64) = (16.0, 34.0);
pub const HUMIDITY_RANGE: (f64, f64) = (45.0, 95.0);
pub const SUNLIGHT_RANGE: (f64, f64) = (2.0, 10.0);
pub const RAINFALL_MEAN: f64 = 5.0;
pub const RAINFALL_STD_DEV: f64 = 10.0;

/// One simulated weather observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// °C
    #[serde(rename = "temp")]
    pub temperature: f64,
    /// %
    pub humidity: f64,
    /// mm, never negative
    pub rainfall: f64,
    /// hours
    pub sunlight: f64,
}

/// Anything that can produce a weather sample for a location
///
/// The recommendation pipeline only talks to this trait, so callers can swap
/// the simulator for a recorded or instrumented source.
pub trait WeatherSource: Send + Sync {
    fn sample(&self, location: &str, seed: Option<u64>) -> WeatherSample;
}

/// The deterministic simulator
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedWeather;

impl WeatherSource for SimulatedWeather {
    fn sample(&self, location: &str, seed: Option<u64>) -> WeatherSample {
        simulate_weather(location, seed)
    }
}

/// Stable seed for a location string
///
/// FxHash is unkeyed, so the same text maps to the same seed in every process.
pub fn location_seed(location: &str) -> u64 {
    let mut hasher = FxHasher::default();
    location.hash(&mut hasher);
    hasher.finish() % SEED_MODULUS
}

/// Simulate weather for `location`, seeding from the location text when
/// `seed` is `None`
pub fn simulate_weather(location: &str, seed: Option<u64>) -> WeatherSample {
    let seed = seed.unwrap_or_else(|| location_seed(location));
    let mut rng = StdRng::seed_from_u64(seed);

    let temperature = rng.gen_range(TEMPERATURE_RANGE.0..=TEMPERATURE_RANGE.1);
    let humidity = rng.gen_range(HUMIDITY_RANGE.0..=HUMIDITY_RANGE.1);
    let z: f64 = rng.sample(StandardNormal);
    let rainfall = (RAINFALL_MEAN + RAINFALL_STD_DEV * z).max(0.0);
    let sunlight = rng.gen_range(SUNLIGHT_RANGE.0..=SUNLIGHT_RANGE.1);

    let sample = WeatherSample {
        temperature: round_to(temperature, 2),
        humidity: round_to(humidity, 2),
        rainfall: round_to(rainfall, 2),
        sunlight: round_to(sunlight, 2),
    };

    tracing::trace!(location, seed, ?sample, "Simulated weather");
    sample
}
