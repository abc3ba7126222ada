//! Configuration for the trainer and the prediction service
//!
//! Both binaries read the same TOML file so that the service always looks
//! for artifacts where the trainer wrote them.
//!
//! ```toml
//! [paths]
//! dataset = "mail_data.csv"
//! model = "artifacts/model.json"
//! vectorizer = "artifacts/vectorizer.json"
//!
//! [training]
//! seed = 3
//! test_size = 0.2
//!
//! [server]
//! listen_addr = "0.0.0.0:8000"
//! cors_origin = "http://localhost:3000"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, SpamError};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    #[serde(default = "default_dataset_path")]
    pub dataset: PathBuf,
    #[serde(default = "default_model_path")]
    pub model: PathBuf,
    #[serde(default = "default_vectorizer_path")]
    pub vectorizer: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingConfig {
    /// Seed for the train/test shuffle
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Fraction of rows held out for evaluation
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    #[serde(default = "default_min_df")]
    pub min_df: usize,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    /// "english" or "none"
    #[serde(default = "default_stop_words")]
    pub stop_words: String,
    /// Inverse L2 regularization strength
    #[serde(default = "default_c")]
    pub c: f64,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_tol")]
    pub tol: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("mail_data.csv")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("artifacts/model.json")
}

fn default_vectorizer_path() -> PathBuf {
    PathBuf::from("artifacts/vectorizer.json")
}

fn default_seed() -> u64 {
    3
}

fn default_test_size() -> f64 {
    0.2
}

fn default_min_df() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_stop_words() -> String {
    "english".to_string()
}

fn default_c() -> f64 {
    1.0
}

fn default_max_iter() -> usize {
    1000
}

fn default_tol() -> f64 {
    1e-4
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset_path(),
            model: default_model_path(),
            vectorizer: default_vectorizer_path(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            test_size: default_test_size(),
            min_df: default_min_df(),
            lowercase: true,
            stop_words: default_stop_words(),
            c: default_c(),
            max_iter: default_max_iter(),
            tol: default_tol(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cors_origin: default_cors_origin(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl TrainingConfig {
    /// Whether the English stop-word list is applied
    pub fn english_stop_words(&self) -> bool {
        self.stop_words.eq_ignore_ascii_case("english")
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SpamError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SpamError::Config(format!("Failed to parse config: {}", e)))
    }

    /// The config file to read: the explicit path if given, else
    /// `config.toml` if it exists in the working directory.
    pub fn locate(path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        }
    }

    /// Read `path` (defaults when `None`), apply environment overrides and
    /// validate. Runs before logging is installed, so it does not log;
    /// callers report the source once the subscriber is up.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override selected settings from `SPAM_*` variables
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SPAM_DATASET_PATH") {
            self.paths.dataset = PathBuf::from(v);
        }
        if let Some(v) = lookup("SPAM_MODEL_PATH") {
            self.paths.model = PathBuf::from(v);
        }
        if let Some(v) = lookup("SPAM_VECTORIZER_PATH") {
            self.paths.vectorizer = PathBuf::from(v);
        }
        if let Some(v) = lookup("SPAM_LISTEN_ADDR") {
            self.server.listen_addr = v;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let t = &self.training;

        if !(t.test_size > 0.0 && t.test_size < 1.0) {
            return Err(SpamError::Config(format!(
                "training.test_size must be in (0, 1), got {}",
                t.test_size
            )));
        }
        if t.min_df == 0 {
            return Err(SpamError::Config("training.min_df must be at least 1".to_string()));
        }
        if !(t.english_stop_words() || t.stop_words.eq_ignore_ascii_case("none")) {
            return Err(SpamError::Config(format!(
                "training.stop_words must be \"english\" or \"none\", got {:?}",
                t.stop_words
            )));
        }
        if t.c <= 0.0 || t.tol < 0.0 {
            return Err(SpamError::Config(
                "training.c must be positive, training.tol non-negative".to_string(),
            ));
        }
        if t.max_iter == 0 {
            return Err(SpamError::Config("training.max_iter must be at least 1".to_string()));
        }
        if self.paths.model == self.paths.vectorizer {
            return Err(SpamError::Config(
                "paths.model and paths.vectorizer must differ".to_string(),
            ));
        }

        Ok(())
    }
}
