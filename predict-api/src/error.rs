//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use spam_classifier::PredictError;
use thiserror::Error;

/// Errors surfaced to HTTP clients
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Model not loaded")]
    ModelNotLoaded,
}

/// Error body: `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            // kept at 500 for compatibility with existing clients
            ApiError::ModelNotLoaded => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        match e {
            PredictError::ModelNotLoaded => ApiError::ModelNotLoaded,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
