//! spam-classifier: TF-IDF + logistic regression spam filter
//!
//! Trains a binary spam/ham classifier over email messages and persists the
//! fitted vectorizer and model as JSON artifacts for the prediction service.
//!
//! # Example
//!
//! ```no_run
//! use spam_classifier::{training, Config};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let report = training::train(&config)?;
//!     println!("train accuracy: {}", report.train_accuracy);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: CSV loading and the synthetic fallback corpus
//! - [`split`]: seeded train/test partitioning
//! - [`features`]: tokenization and TF-IDF
//! - [`model`]: logistic regression
//! - [`artifacts`]: on-disk persistence
//! - [`training`]: the end-to-end pipeline
//! - [`predictor`]: loaded state for serving
//! - [`logging`]: tracing subscriber setup for the binaries

pub mod artifacts;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod predictor;
pub mod split;
pub mod training;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SpamError};
pub use predictor::{ModelBundle, ModelState, PredictError};
pub use types::{Category, Prediction, Record};
