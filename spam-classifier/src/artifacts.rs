//! Persistence of fitted model and vectorizer
//!
//! Each artifact is a JSON envelope carrying a kind tag and a format version
//! around the serialized object. Writes go through a temporary sibling file
//! that is renamed into place, so a crashed trainer never leaves a truncated
//! artifact behind.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, SpamError};
use crate::features::TfidfVectorizer;
use crate::model::LogisticRegression;

/// Bumped whenever the payload layout changes incompatibly
pub const FORMAT_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Model,
    Vectorizer,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    format_version: u32,
    kind: ArtifactKind,
    trained_at: DateTime<Utc>,
    payload: T,
}

/// Locations of the two artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub vectorizer: PathBuf,
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, vectorizer: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            vectorizer: vectorizer.into(),
        }
    }

    /// Both files are present
    pub fn exist(&self) -> bool {
        self.model.exists() && self.vectorizer.exists()
    }
}

pub fn save_model<P: AsRef<Path>>(path: P, model: &LogisticRegression) -> Result<()> {
    save(path.as_ref(), ArtifactKind::Model, model)
}

pub fn save_vectorizer<P: AsRef<Path>>(path: P, vectorizer: &TfidfVectorizer) -> Result<()> {
    save(path.as_ref(), ArtifactKind::Vectorizer, vectorizer)
}

pub fn load_model<P: AsRef<Path>>(path: P) -> Result<LogisticRegression> {
    let path = path.as_ref();
    let model: LogisticRegression = load(path, ArtifactKind::Model)?;
    model.check_consistency().map_err(|reason| corrupt(path, reason))?;
    Ok(model)
}

pub fn load_vectorizer<P: AsRef<Path>>(path: P) -> Result<TfidfVectorizer> {
    let path = path.as_ref();
    let vectorizer: TfidfVectorizer = load(path, ArtifactKind::Vectorizer)?;
    vectorizer
        .check_consistency()
        .map_err(|reason| corrupt(path, reason))?;
    Ok(vectorizer)
}

fn save<T: Serialize>(path: &Path, kind: ArtifactKind, payload: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let envelope = Envelope {
        format_version: FORMAT_VERSION,
        kind,
        trained_at: Utc::now(),
        payload,
    };
    let bytes = serde_json::to_vec(&envelope)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;

    info!("Saved {:?} artifact to {} ({} bytes)", kind, path.display(), bytes.len());
    Ok(())
}

fn load<T: DeserializeOwned>(path: &Path, kind: ArtifactKind) -> Result<T> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SpamError::ArtifactMissing(path.to_path_buf()))
        }
        Err(e) => return Err(SpamError::Io(e)),
    };

    let envelope: Envelope<serde_json::Value> =
        serde_json::from_slice(&bytes).map_err(|e| corrupt(path, e.to_string()))?;

    if envelope.kind != kind {
        return Err(corrupt(
            path,
            format!("expected {:?} artifact, found {:?}", kind, envelope.kind),
        ));
    }
    if envelope.format_version != FORMAT_VERSION {
        return Err(corrupt(
            path,
            format!(
                "unsupported format version {} (expected {})",
                envelope.format_version, FORMAT_VERSION
            ),
        ));
    }

    debug!(
        "Loading {:?} artifact from {} trained at {}",
        kind,
        path.display(),
        envelope.trained_at
    );

    serde_json::from_value(envelope.payload).map_err(|e| corrupt(path, e.to_string()))
}

fn corrupt(path: &Path, reason: String) -> SpamError {
    SpamError::ArtifactCorrupt {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::TfidfParams;
    use crate::model::LogisticParams;
    use tempfile::TempDir;

    fn fitted() -> (TfidfVectorizer, LogisticRegression) {
        let docs = ["win free lottery", "see you at lunch", "claim prize now", "talk later"];
        let labels = [0, 1, 0, 1];
        let (vectorizer, x) =
            TfidfVectorizer::fit_transform(TfidfParams::default(), &docs).unwrap();
        let model = LogisticRegression::fit(LogisticParams::default(), &x, &labels).unwrap();
        (vectorizer, model)
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::new(
            dir.path().join("nested/model.json"),
            dir.path().join("nested/vectorizer.json"),
        );
        let (vectorizer, model) = fitted();

        assert!(!paths.exist());
        save_model(&paths.model, &model).unwrap();
        save_vectorizer(&paths.vectorizer, &vectorizer).unwrap();
        assert!(paths.exist());

        let loaded_model = load_model(&paths.model).unwrap();
        let loaded_vectorizer = load_vectorizer(&paths.vectorizer).unwrap();

        assert_eq!(loaded_model, model);
        assert_eq!(loaded_vectorizer, vectorizer);

        let text = "free lottery prize later";
        assert_eq!(loaded_vectorizer.transform(text), vectorizer.transform(text));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        let (_, model) = fitted();

        fs::write(&path, b"stale").unwrap();
        save_model(&path, &model).unwrap();
        assert_eq!(load_model(&path).unwrap(), model);
        assert!(!dir.path().join("model.json.tmp").exists());
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let err = load_model(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SpamError::ArtifactMissing(_)));
    }

    #[test]
    fn test_load_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"\x80\x04not json").unwrap();

        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, SpamError::ArtifactCorrupt { .. }));
    }

    #[test]
    fn test_load_wrong_kind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("artifact.json");
        let (vectorizer, _) = fitted();
        save_vectorizer(&path, &vectorizer).unwrap();

        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, SpamError::ArtifactCorrupt { .. }));
    }
}
