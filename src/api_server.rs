// Axum API Server Module
//
// Purpose: HTTP surface over the recommendation pipeline.
// The server keeps only the most recent successful result (export buffer).

use std::sync::{Arc, RwLock};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AdvisorConfig;
use crate::crops::crop_profiles;
use crate::error::AgroMindError;
use crate::inference::InferenceEngine;
use crate::recommend::{
    localized_error, Recommendation, RecommendationResponse, RecommendationService,
    RecommendRequest,
};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecommendationService>,
    pub latest: Arc<RwLock<Option<Recommendation>>>,
}

impl AppState {
    /// Build state and compile the network up front so start-up fails fast
    pub fn new(config: AdvisorConfig) -> anyhow::Result<Self> {
        config.validate()?;

        tracing::info!("Compiling inference engine...");
        InferenceEngine::initialize()?;

        Ok(Self {
            service: Arc::new(RecommendationService::new(config)),
            latest: Arc::new(RwLock::new(None)),
        })
    }

    fn remember(&self, rec: &Recommendation) {
        let mut slot = self.latest.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(rec.clone());
    }

    fn latest(&self) -> Option<Recommendation> {
        self.latest
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Supported crops and their static profiles
        .route("/api/crops", get(list_crops))
        // Recommendation endpoints
        .route("/api/recommend", post(recommend))
        .route("/api/recommend/latest", get(latest_recommendation))
        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_crops() -> impl IntoResponse {
    Json(serde_json::json!({
        "crops": crop_profiles(),
    }))
}

async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let service = Arc::clone(&state.service);

    // CPU-bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || service.recommend_request(&request))
        .await
        .map_err(|e| AppError::Internal(format!("Recommendation task failed: {}", e)))?;

    match result {
        Ok(rec) => {
            state.remember(&rec);
            let language = state.service.config().language;
            Ok(Json(RecommendationResponse::from_result(Ok(rec), language)))
        }
        Err(e) => Err(AppError::Recommend(e, state.service.config().language)),
    }
}

async fn latest_recommendation(
    State(state): State<AppState>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let language = state.service.config().language;
    state
        .latest()
        .map(|rec| Json(RecommendationResponse::from_result(Ok(rec), language)))
        .ok_or_else(|| AppError::NotFound("No recommendation has been made yet".to_string()))
}

// ============================================================================
// Error Handling
// ============================================================================

enum AppError {
    Recommend(AgroMindError, crate::config::Language),
    Internal(String),
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Recommend(e, language) => {
                let status = if e.is_validation() {
                    StatusCode::UNPROCESSABLE_ENTITY
                } else {
                    tracing::error!("{}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, localized_error(&e, language))
            }
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(serde_json::json!({
            "ok": false,
            "error": message
        }));

        (status, body).into_response()
    }
}
