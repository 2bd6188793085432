//! API Handlers

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use spam_rs::{InferenceService, Label};
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::ApiError;

/// Shared application state
pub struct AppState {
    pub service: Arc<InferenceService>,
    pub default_threshold: f64,
}

/// Request body for POST /predict
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictParams {
    pub threshold: Option<f64>,
}

/// Response body for POST /predict
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub result: Label,
    pub confidence: f64,
    pub threshold_used: f64,
}

/// GET / - Liveness message
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Spam classifier API is running"
    }))
}

/// GET /health - Service and model details
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "spam-api",
        "version": env!("CARGO_PKG_VERSION"),
        "vocabulary_size": state.service.vocabulary_size(),
        "normalizer": state.service.normalizer().to_string(),
    }))
}

/// POST /predict?threshold=<f64> - Classify one message
pub async fn predict(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PredictParams>, QueryRejection>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Query(params) = params?;
    let Json(request) = body?;
    let threshold = params.threshold.unwrap_or(state.default_threshold);

    debug!(threshold, length = request.message.len(), "Predict request");

    // Scoring is CPU-bound; keep it off the async workers
    let service = state.service.clone();
    let prediction = tokio::task::spawn_blocking(move || service.predict(&request.message, threshold))
        .await
        .map_err(|e| {
            error!("Prediction task failed: {}", e);
            ApiError::Internal(format!("prediction task failed: {e}"))
        })??;

    Ok(Json(PredictResponse {
        result: prediction.label,
        confidence: prediction.confidence,
        threshold_used: prediction.threshold_used,
    }))
}
