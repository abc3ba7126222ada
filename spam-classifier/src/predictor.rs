//! Loaded model state for serving predictions
//!
//! `ModelState` is resolved once at startup. Missing or unreadable
//! artifacts leave it `Unloaded`; it never transitions afterwards.

use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::artifacts::{self, ArtifactPaths};
use crate::error::SpamError;
use crate::features::TfidfVectorizer;
use crate::model::LogisticRegression;
use crate::types::Prediction;

/// Fitted vectorizer and classifier, immutable once built
#[derive(Debug, Clone)]
pub struct ModelBundle {
    model: LogisticRegression,
    vectorizer: TfidfVectorizer,
}

impl ModelBundle {
    /// Pair a model with the vectorizer it was trained on. Their feature
    /// dimensions must agree.
    pub fn new(model: LogisticRegression, vectorizer: TfidfVectorizer) -> Result<Self, SpamError> {
        if model.dim() != vectorizer.dim() {
            return Err(SpamError::DimensionMismatch {
                model: model.dim(),
                vectorizer: vectorizer.dim(),
            });
        }
        Ok(Self { model, vectorizer })
    }

    /// Read both artifacts from disk. A model and vectorizer from different
    /// training runs are reported as a corrupt model artifact.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, SpamError> {
        let model = artifacts::load_model(&paths.model)?;
        let vectorizer = artifacts::load_vectorizer(&paths.vectorizer)?;
        Self::new(model, vectorizer).map_err(|e| SpamError::ArtifactCorrupt {
            path: paths.model.clone(),
            reason: e.to_string(),
        })
    }

    /// Vectorize and classify one message
    pub fn predict(&self, message: &str) -> Prediction {
        let features = self.vectorizer.transform(message);
        Prediction::from_label(self.model.predict(&features))
    }

    pub fn model(&self) -> &LogisticRegression {
        &self.model
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictError {
    #[error("Model not loaded")]
    ModelNotLoaded,
}

/// Whether a bundle is available for prediction
#[derive(Debug, Clone)]
pub enum ModelState {
    Loaded(Arc<ModelBundle>),
    Unloaded { reason: String },
}

impl ModelState {
    /// Attempt to load the artifacts. Never fails: problems are logged and
    /// produce `Unloaded`.
    pub fn load(paths: &ArtifactPaths) -> Self {
        if !paths.exist() {
            warn!(
                "Model artifacts not found ({}, {}). Run train-model first.",
                paths.model.display(),
                paths.vectorizer.display()
            );
            return ModelState::Unloaded {
                reason: "artifacts not found".to_string(),
            };
        }

        match ModelBundle::load(paths) {
            Ok(bundle) => {
                info!(
                    "Model and vectorizer loaded successfully ({} features)",
                    bundle.vectorizer.dim()
                );
                ModelState::Loaded(Arc::new(bundle))
            }
            Err(e) => {
                error!("Error loading model: {}", e);
                ModelState::Unloaded {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded(_))
    }

    pub fn predict(&self, message: &str) -> Result<Prediction, PredictError> {
        match self {
            ModelState::Loaded(bundle) => Ok(bundle.predict(message)),
            ModelState::Unloaded { .. } => Err(PredictError::ModelNotLoaded),
        }
    }
}

impl From<ModelBundle> for ModelState {
    fn from(bundle: ModelBundle) -> Self {
        ModelState::Loaded(Arc::new(bundle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;
    use crate::types::{Category, Record};
    use crate::Config;
    use std::path::PathBuf;

    #[test]
    fn test_unloaded_always_fails() {
        let state = ModelState::load(&ArtifactPaths::new(
            PathBuf::from("/nonexistent/model.json"),
            PathBuf::from("/nonexistent/vectorizer.json"),
        ));

        assert!(!state.is_loaded());
        for message in ["hi", "", "Win a free lottery now!"] {
            assert_eq!(state.predict(message), Err(PredictError::ModelNotLoaded));
        }
    }

    #[test]
    fn test_loaded_predicts_label() {
        let pipeline =
            crate::training::fit(&crate::dataset::synthetic(), &crate::Config::default()).unwrap();
        let state: ModelState = ModelBundle::new(pipeline.model, pipeline.vectorizer)
            .unwrap()
            .into();

        let p = state.predict("Win a free lottery now!").unwrap();
        assert_eq!(p.category, Category::Spam);
        assert!(p.is_spam);

        let p = state.predict("Can we talk later?").unwrap();
        assert_eq!(p.category, Category::Ham);
        assert!(!p.is_spam);
    }

    #[test]
    fn test_mismatched_artifacts_stay_unloaded() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = ArtifactPaths::new(
            dir.path().join("model.json"),
            dir.path().join("vectorizer.json"),
        );

        let synthetic = crate::training::fit(&dataset::synthetic(), &Config::default()).unwrap();
        let other: Vec<Record> = (0..30)
            .map(|i| {
                if i % 3 == 0 {
                    Record::new(Category::Spam, format!("urgent bonus voucher {} cash reward", i))
                } else {
                    Record::new(Category::Ham, format!("lunch tomorrow with grandma {}", i))
                }
            })
            .collect();
        let other = crate::training::fit(&other, &Config::default()).unwrap();
        assert_ne!(synthetic.model.dim(), other.vectorizer.dim());

        assert!(matches!(
            ModelBundle::new(synthetic.model.clone(), other.vectorizer.clone()),
            Err(SpamError::DimensionMismatch { .. })
        ));

        artifacts::save_model(&paths.model, &synthetic.model).unwrap();
        artifacts::save_vectorizer(&paths.vectorizer, &other.vectorizer).unwrap();

        assert!(matches!(
            ModelBundle::load(&paths),
            Err(SpamError::ArtifactCorrupt { .. })
        ));
        let state = ModelState::load(&paths);
        assert!(!state.is_loaded());
        assert_eq!(state.predict("Win a free lottery now!"), Err(PredictError::ModelNotLoaded));
    }
}
