// Axum API Server Module
//
// Purpose: thin HTTP adapter over RegionScorer. Scoring is CPU-bound and runs
// on the blocking pool; operation failures are returned as {"error": ...}
// payloads with status 200, matching the library boundary.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::EngineConfig;
use crate::error::into_payload;
use crate::scorer::RegionScorer;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<RegionScorer>,
}

impl AppState {
    pub fn new(scorer: RegionScorer) -> Self {
        Self {
            scorer: Arc::new(scorer),
        }
    }

    /// State reading CSV exports from `data_dir`
    pub fn from_data_dir(data_dir: &str) -> anyhow::Result<Self> {
        let config = EngineConfig::from_data_dir(data_dir)?;
        Ok(Self::new(RegionScorer::from_config(config)))
    }
}

// ============================================================================
// Router Configuration
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))

        // Region views
        .route("/nominal/:region", get(get_nominal_output))
        .route("/growth/:region", get(get_real_growth))
        .route("/renewables/:region", get(get_renewable_suggestions))

        // Scoring
        .route("/recommendations", get(get_all_recommendations))
        .route("/recommendations/:region", get(get_recommendation))

        // Data audit
        .route("/health-audit", get(get_health_audit))

        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Regional sector attractiveness API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Run a scorer operation on the blocking pool
async fn run_blocking<F>(state: AppState, op: F) -> Result<Json<Value>, AppError>
where
    F: FnOnce(&RegionScorer) -> Value + Send + 'static,
{
    let scorer = state.scorer.clone();
    let payload = tokio::task::spawn_blocking(move || op(&scorer))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;
    Ok(Json(payload))
}

async fn get_nominal_output(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<Value>, AppError> {
    run_blocking(state, move |scorer| into_payload(scorer.nominal_output(&region))).await
}

async fn get_real_growth(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<Value>, AppError> {
    run_blocking(state, move |scorer| into_payload(scorer.real_growth(&region))).await
}

async fn get_recommendation(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<Value>, AppError> {
    tracing::info!("Scoring region {}", region);
    run_blocking(state, move |scorer| into_payload(scorer.recommend(&region))).await
}

async fn get_all_recommendations(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    run_blocking(state, |scorer| into_payload(scorer.all_recommendations())).await
}

async fn get_renewable_suggestions(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<Value>, AppError> {
    run_blocking(state, move |scorer| into_payload(scorer.renewable_suggestions(&region))).await
}

#[derive(Debug, Deserialize)]
pub struct AuditParams {
    pub region: Option<String>,
}

async fn get_health_audit(
    State(state): State<AppState>,
    Query(params): Query<AuditParams>,
) -> Result<Json<Value>, AppError> {
    run_blocking(state, move |scorer| {
        into_payload(scorer.health_audit(params.region.as_deref()))
    })
    .await
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
