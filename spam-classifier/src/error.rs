use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpamError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Empty vocabulary: no token survived tokenization and stop-word removal")]
    EmptyVocabulary,

    #[error("Training labels contain a single class ({0}); both spam and ham are required")]
    SingleClass(u8),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Model expects {model} features but the vectorizer produces {vectorizer}")]
    DimensionMismatch { model: usize, vectorizer: usize },

    #[error("Artifact not found: {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("Corrupt artifact {}: {reason}", .path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SpamError>;
