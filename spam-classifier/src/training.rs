//! Training pipeline
//!
//! dataset -> label encoding -> seeded split -> TF-IDF fit on the training
//! partition -> logistic regression -> evaluation -> artifacts.

use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::artifacts::{self, ArtifactPaths};
use crate::config::Config;
use crate::dataset;
use crate::error::Result;
use crate::features::{TfidfParams, TfidfVectorizer};
use crate::model::{accuracy, LogisticParams, LogisticRegression};
use crate::split::train_test_split;
use crate::types::Record;

/// Summary of one training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub total_rows: usize,
    /// Rows dropped for lacking a spam/ham category
    pub skipped_rows: usize,
    pub train_samples: usize,
    pub test_samples: usize,
    pub vocabulary_size: usize,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    /// Whether the solver reached its gradient tolerance
    pub converged: bool,
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
}

/// Fitted objects before they are written to disk
#[derive(Debug, Clone)]
pub struct TrainedPipeline {
    pub vectorizer: TfidfVectorizer,
    pub model: LogisticRegression,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub train_samples: usize,
    pub test_samples: usize,
}

impl Config {
    pub fn tfidf_params(&self) -> TfidfParams {
        TfidfParams {
            lowercase: self.training.lowercase,
            stop_words: self.training.english_stop_words(),
            min_df: self.training.min_df,
        }
    }

    pub fn logistic_params(&self) -> LogisticParams {
        LogisticParams {
            c: self.training.c,
            max_iter: self.training.max_iter,
            tol: self.training.tol,
        }
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.paths.model, &self.paths.vectorizer)
    }
}

/// Fit vectorizer and model on `records` without touching the filesystem.
///
/// The vectorizer only ever sees training-partition messages; the test
/// partition is transformed with the already fitted vocabulary.
pub fn fit(records: &[Record], config: &Config) -> Result<TrainedPipeline> {
    let labeled: Vec<(&str, u8)> = records
        .iter()
        .filter_map(|r| r.category.map(|c| (r.message.as_str(), c.label())))
        .collect();

    let split = train_test_split(labeled.len(), config.training.test_size, config.training.seed)?;
    let (train, test) = split.apply(&labeled);

    let train_messages: Vec<&str> = train.iter().map(|(m, _)| *m).collect();
    let train_labels: Vec<u8> = train.iter().map(|(_, y)| *y).collect();
    let test_messages: Vec<&str> = test.iter().map(|(m, _)| *m).collect();
    let test_labels: Vec<u8> = test.iter().map(|(_, y)| *y).collect();

    info!("Extracting features...");
    let (vectorizer, train_features) =
        TfidfVectorizer::fit_transform(config.tfidf_params(), &train_messages)?;
    let test_features = vectorizer.transform_batch(&test_messages);
    info!("Vocabulary size: {}", vectorizer.dim());

    info!("Training model...");
    let model = LogisticRegression::fit(config.logistic_params(), &train_features, &train_labels)?;

    let train_accuracy = accuracy(&train_labels, &model.predict_batch(&train_features));
    let test_accuracy = accuracy(&test_labels, &model.predict_batch(&test_features));
    info!("Accuracy on training data: {}", train_accuracy);
    info!("Accuracy on test data: {}", test_accuracy);

    Ok(TrainedPipeline {
        vectorizer,
        model,
        train_accuracy,
        test_accuracy,
        train_samples: train_labels.len(),
        test_samples: test_labels.len(),
    })
}

/// Run the full training pipeline and write both artifacts
pub fn train(config: &Config) -> Result<TrainingReport> {
    let records = dataset::load_or_synthetic(&config.paths.dataset)?;

    let skipped_rows = records.iter().filter(|r| r.category.is_none()).count();
    if skipped_rows > 0 {
        warn!("Skipping {} rows without a spam/ham category", skipped_rows);
    }

    let pipeline = fit(&records, config)?;

    info!("Saving artifacts...");
    let paths = config.artifact_paths();
    artifacts::save_model(&paths.model, &pipeline.model)?;
    artifacts::save_vectorizer(&paths.vectorizer, &pipeline.vectorizer)?;
    info!("Model saved to {}", paths.model.display());
    info!("Vectorizer saved to {}", paths.vectorizer.display());

    Ok(TrainingReport {
        total_rows: records.len(),
        skipped_rows,
        train_samples: pipeline.train_samples,
        test_samples: pipeline.test_samples,
        vocabulary_size: pipeline.vectorizer.dim(),
        train_accuracy: pipeline.train_accuracy,
        test_accuracy: pipeline.test_accuracy,
        converged: pipeline.model.converged(),
        model_path: paths.model,
        vectorizer_path: paths.vectorizer,
    })
}
