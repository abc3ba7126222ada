//! predict-api: HTTP prediction service for the spam classifier
//!
//! Loads the trained model and vectorizer once at startup and exposes:
//!
//! - `GET /` - liveness message
//! - `GET /health` - health and model state
//! - `POST /predict` - `{"message": "..."}` -> `{"prediction": "Spam"|"Ham", "is_spam": bool}`
//!
//! When the artifacts are missing or unreadable the service still starts;
//! `/predict` then answers `500 {"detail": "Model not loaded"}`.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::ApiServer;
