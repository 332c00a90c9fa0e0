//! Advisor Configuration
//!
//! Score thresholds and the advisory language. Loaded from defaults, a JSON
//! file, or environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_LOW_THRESHOLD: f64 = 0.35;
pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.65;

/// Language of advisory text and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    /// Traditional Chinese (Taiwan)
    #[default]
    ZhTw,
    En,
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "zh-tw" | "zh" | "tw" => Ok(Language::ZhTw),
            "en" | "en-us" | "en-gb" => Ok(Language::En),
            other => anyhow::bail!("Unknown advisory language '{}' (expected zh-tw or en)", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Scores at or below this are "low"
    pub low_threshold: f64,
    /// Scores at or above this are "high"
    pub high_threshold: f64,
    pub language: Language,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            language: Language::default(),
        }
    }
}

impl AdvisorConfig {
    /// Load from a JSON file; absent fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read advisor config: {:?}", path))?;

        let config: AdvisorConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse advisor config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Build from the environment
    ///
    /// `AGROMIND_CONFIG` names a JSON file to start from; `AGROMIND_LANGUAGE`,
    /// `AGROMIND_LOW_THRESHOLD` and `AGROMIND_HIGH_THRESHOLD` override it.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("AGROMIND_CONFIG") {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(lang) = std::env::var("AGROMIND_LANGUAGE") {
            config.language = lang.parse()?;
        }
        if let Ok(v) = std::env::var("AGROMIND_LOW_THRESHOLD") {
            config.low_threshold = v
                .trim()
                .parse()
                .with_context(|| format!("AGROMIND_LOW_THRESHOLD is not a number: {}", v))?;
        }
        if let Ok(v) = std::env::var("AGROMIND_HIGH_THRESHOLD") {
            config.high_threshold = v
                .trim()
                .parse()
                .with_context(|| format!("AGROMIND_HIGH_THRESHOLD is not a number: {}", v))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Thresholds must satisfy 0 <= low < high <= 1
    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.low_threshold) || !unit.contains(&self.high_threshold) {
            anyhow::bail!(
                "Thresholds must lie in [0, 1] (low = {}, high = {})",
                self.low_threshold,
                self.high_threshold
            );
        }
        if self.low_threshold >= self.high_threshold {
            anyhow::bail!(
                "Low threshold {} must be below high threshold {}",
                self.low_threshold,
                self.high_threshold
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::default();
        assert_eq!(config.low_threshold, 0.35);
        assert_eq!(config.high_threshold, 0.65);
        assert_eq!(config.language, Language::ZhTw);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AdvisorConfig = serde_json::from_str(r#"{"language": "en"}"#).unwrap();
        assert_eq!(config.language, Language::En);
        assert_eq!(config.low_threshold, DEFAULT_LOW_THRESHOLD);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("agromind_config_{}.json", std::process::id()));
        fs::write(&path, r#"{"low_threshold": 0.3, "high_threshold": 0.7}"#).unwrap();
        let config = AdvisorConfig::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.low_threshold, 0.3);
        assert_eq!(config.high_threshold, 0.7);
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = AdvisorConfig::load(Path::new("/nonexistent/agromind.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read advisor config"));
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let config = AdvisorConfig {
            low_threshold: 0.7,
            high_threshold: 0.3,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AdvisorConfig {
            high_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("zh_TW".parse::<Language>().unwrap(), Language::ZhTw);
        assert!("fr".parse::<Language>().is_err());
    }
}
