use crate::recommend::RecommendationResponse;

/// JSON formatter for recommendation responses
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format response as pretty-printed JSON
    pub fn format(response: &RecommendationResponse) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(response)
    }

    /// Format response as compact JSON (no whitespace)
    pub fn format_compact(response: &RecommendationResponse) -> Result<String, serde_json::Error> {
        serde_json::to_string(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdvisorConfig, Language};
    use crate::recommend::RecommendationService;
    use crate::RecommendRequest;

    #[test]
    fn test_format_success() {
        let service = RecommendationService::new(AdvisorConfig::default());
        let response = service.respond(
            &RecommendRequest::new("rice", "TestCity").with_date("2024-06-01T08:00:00"),
        );

        let json = JsonFormatter::format(&response).unwrap();

        assert!(json.contains("\"ok\": true"));
        assert!(json.contains("\"crop\": \"rice\""));
        assert!(json.contains("\"date\": \"2024-06-01T08:00:00\""));
        assert!(json.contains("\"growth_stage\": 0.4"));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_format_failure() {
        let response = crate::RecommendationResponse::from_result(
            crate::recommend("barley", "TestCity", None),
            Language::En,
        );

        let json = JsonFormatter::format_compact(&response).unwrap();

        assert!(json.starts_with("{\"ok\":false"));
        assert!(json.contains("Unsupported crop 'barley'"));
        assert!(!json.contains("model_scores"));
    }
}
