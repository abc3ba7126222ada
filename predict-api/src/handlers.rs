//! API request handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use spam_classifier::{ModelState, Prediction};

use crate::error::ApiError;

/// Shared application state
pub struct AppState {
    pub model: ModelState,
}

impl AppState {
    pub fn new(model: ModelState) -> Self {
        Self { model }
    }
}

/// Prediction request body
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub message: String,
}

/// Prediction response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub prediction: String,
    pub is_spam: bool,
}

impl From<Prediction> for PredictionResponse {
    fn from(p: Prediction) -> Self {
        Self {
            prediction: p.category.to_string(),
            is_spam: p.is_spam,
        }
    }
}

/// Root status message
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub model_loaded: bool,
}

/// GET / - Liveness acknowledgment
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Spam Prediction API is running",
    })
}

/// GET /health - Service health including model state
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "predict-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_loaded: state.model.is_loaded(),
    })
}

/// POST /predict - Classify one message
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    debug!("Predict request: {} bytes", req.message.len());

    let prediction = state.model.predict(&req.message)?;
    info!("Prediction: {}", prediction.category);

    Ok(Json(prediction.into()))
}
