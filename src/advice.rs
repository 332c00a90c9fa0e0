//! Score Interpretation
//!
//! Thresholds raw sigmoid scores into advisory levels and binds each level to
//! a fixed advisory sentence. Intervals are closed at the thresholds:
//! score >= high -> High, score <= low -> Low, otherwise Medium.

use serde::{Deserialize, Serialize};

use crate::config::{AdvisorConfig, Language};
use crate::inference::ScorePair;

/// Advisory level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryLevel {
    Low,
    Medium,
    High,
}

impl AdvisoryLevel {
    /// Canonical label: "low" / "medium" / "high"
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryLevel::Low => "low",
            AdvisoryLevel::Medium => "medium",
            AdvisoryLevel::High => "high",
        }
    }

    /// Localized display label
    pub fn display(&self, language: Language) -> &'static str {
        match (language, self) {
            (Language::ZhTw, AdvisoryLevel::High) => "高",
            (Language::ZhTw, AdvisoryLevel::Medium) => "中",
            (Language::ZhTw, AdvisoryLevel::Low) => "低",
            (Language::En, level) => level.as_str(),
        }
    }
}

/// Which recommendation a score belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceCategory {
    Irrigation,
    Fertilization,
}

// ============================================================================
// EMBEDDED ADVICE TEXT
// ============================================================================

/// Fixed advisory sentence for a category, level and language
pub fn advice_text(category: AdviceCategory, level: AdvisoryLevel, language: Language) -> &'static str {
    use AdviceCategory::{Fertilization, Irrigation};
    use AdvisoryLevel::{High, Low, Medium};

    match (language, category, level) {
        (Language::ZhTw, Irrigation, High) => "建議安排灌溉：分次、避免積水。",
        (Language::ZhTw, Irrigation, Medium) => "視土壤狀況少量多次。",
        (Language::ZhTw, Irrigation, Low) => "暫不灌溉，持續觀察。",
        (Language::ZhTw, Fertilization, High) => "建議補充肥分：以氮/鉀為主，避免過量。",
        (Language::ZhTw, Fertilization, Medium) => "可少量複合肥，視葉色與生長勢調整。",
        (Language::ZhTw, Fertilization, Low) => "暫不施肥，以觀測為主。",

        (Language::En, Irrigation, High) => {
            "Schedule irrigation: water in several rounds and avoid standing water."
        }
        (Language::En, Irrigation, Medium) => "Water little and often, depending on soil condition.",
        (Language::En, Irrigation, Low) => "Hold off on irrigation and keep monitoring.",
        (Language::En, Fertilization, High) => {
            "Top up nutrients, mainly nitrogen/potassium, without overdoing it."
        }
        (Language::En, Fertilization, Medium) => {
            "Apply a small amount of compound fertilizer; adjust to leaf colour and vigour."
        }
        (Language::En, Fertilization, Low) => "Hold off on fertilizing; observe for now.",
    }
}

/// Threshold a score into a level (closed intervals at both thresholds)
pub fn label_score(score: f64, low_threshold: f64, high_threshold: f64) -> AdvisoryLevel {
    if score >= high_threshold {
        AdvisoryLevel::High
    } else if score <= low_threshold {
        AdvisoryLevel::Low
    } else {
        AdvisoryLevel::Medium
    }
}

/// Interpreted model output, as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelScores {
    pub irrigation_score: f64,
    pub fertilization_score: f64,
    pub irrigation_level: AdvisoryLevel,
    pub fertilization_level: AdvisoryLevel,
    pub irrigation_advice: &'static str,
    pub fertilization_advice: &'static str,
}

impl ModelScores {
    /// Label both scores and attach the advisory sentences
    pub fn interpret(scores: &ScorePair, config: &AdvisorConfig) -> Self {
        let irrigation_score = f64::from(scores.irrigation);
        let fertilization_score = f64::from(scores.fertilization);

        let irrigation_level =
            label_score(irrigation_score, config.low_threshold, config.high_threshold);
        let fertilization_level =
            label_score(fertilization_score, config.low_threshold, config.high_threshold);

        Self {
            irrigation_score,
            fertilization_score,
            irrigation_level,
            fertilization_level,
            irrigation_advice: advice_text(AdviceCategory::Irrigation, irrigation_level, config.language),
            fertilization_advice: advice_text(
                AdviceCategory::Fertilization,
                fertilization_level,
                config.language,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LO: f64 = 0.35;
    const HI: f64 = 0.65;

    #[test]
    fn test_label_boundaries_are_closed() {
        assert_eq!(label_score(0.65, LO, HI), AdvisoryLevel::High);
        assert_eq!(label_score(0.35, LO, HI), AdvisoryLevel::Low);
    }

    #[test]
    fn test_label_regions() {
        assert_eq!(label_score(0.99, LO, HI), AdvisoryLevel::High);
        assert_eq!(label_score(0.6500001, LO, HI), AdvisoryLevel::High);
        assert_eq!(label_score(0.6499999, LO, HI), AdvisoryLevel::Medium);
        assert_eq!(label_score(0.5, LO, HI), AdvisoryLevel::Medium);
        assert_eq!(label_score(0.3500001, LO, HI), AdvisoryLevel::Medium);
        assert_eq!(label_score(0.3499999, LO, HI), AdvisoryLevel::Low);
        assert_eq!(label_score(0.01, LO, HI), AdvisoryLevel::Low);
    }

    #[test]
    fn test_label_monotonic() {
        let mut previous = AdvisoryLevel::Low;
        for i in 0..=1000 {
            let level = label_score(i as f64 / 1000.0, LO, HI);
            let rank = |l: AdvisoryLevel| l as u8;
            assert!(rank(level) >= rank(previous));
            previous = level;
        }
    }

    #[test]
    fn test_original_advice_verbatim() {
        use AdviceCategory::*;
        use AdvisoryLevel::*;
        let zh = Language::ZhTw;
        assert_eq!(advice_text(Irrigation, High, zh), "建議安排灌溉：分次、避免積水。");
        assert_eq!(advice_text(Irrigation, Medium, zh), "視土壤狀況少量多次。");
        assert_eq!(advice_text(Irrigation, Low, zh), "暫不灌溉，持續觀察。");
        assert_eq!(advice_text(Fertilization, High, zh), "建議補充肥分：以氮/鉀為主，避免過量。");
        assert_eq!(advice_text(Fertilization, Medium, zh), "可少量複合肥，視葉色與生長勢調整。");
        assert_eq!(advice_text(Fertilization, Low, zh), "暫不施肥，以觀測為主。");
    }

    #[test]
    fn test_every_sentence_present_and_distinct() {
        let mut seen = std::collections::HashSet::new();
        for category in [AdviceCategory::Irrigation, AdviceCategory::Fertilization] {
            for language in [Language::ZhTw, Language::En] {
                for level in [AdvisoryLevel::Low, AdvisoryLevel::Medium, AdvisoryLevel::High] {
                    let text = advice_text(category, level, language);
                    assert!(!text.trim().is_empty(), "{:?} {:?} {:?}", category, level, language);
                    assert!(seen.insert(text), "duplicate sentence: {}", text);
                }
            }
        }
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(AdvisoryLevel::High.display(Language::ZhTw), "高");
        assert_eq!(AdvisoryLevel::Low.display(Language::En), "low");
    }

    #[test]
    fn test_interpret_uses_config() {
        let scores = ScorePair { irrigation: 0.9, fertilization: 0.5 };
        let interpreted = ModelScores::interpret(&scores, &AdvisorConfig::default());
        assert_eq!(interpreted.irrigation_level, AdvisoryLevel::High);
        assert_eq!(interpreted.fertilization_level, AdvisoryLevel::Medium);
        assert_eq!(interpreted.irrigation_advice, "建議安排灌溉：分次、避免積水。");

        let strict = AdvisorConfig {
            high_threshold: 0.95,
            language: Language::En,
            ..Default::default()
        };
        let interpreted = ModelScores::interpret(&scores, &strict);
        assert_eq!(interpreted.irrigation_level, AdvisoryLevel::Medium);
        assert!(interpreted.irrigation_advice.starts_with("Water little and often"));
    }

    #[test]
    fn test_levels_serialize_lowercase() {
        let scores = ScorePair { irrigation: 0.1, fertilization: 0.7 };
        let json = serde_json::to_value(ModelScores::interpret(&scores, &AdvisorConfig::default())).unwrap();
        assert_eq!(json["irrigation_level"], "low");
        assert_eq!(json["fertilization_level"], "high");
    }
}
