//! Model Module - pre-trained URL classifier
//!
//! The classifier is loaded exactly once at startup and shared read-only
//! with every request. Backends are chosen by artifact extension:
//!
//! - `.onnx` → [`OnnxClassifier`] (ONNX Runtime)
//! - `.json` → [`LinearClassifier`] (logistic regression weights)

pub mod linear;
pub mod onnx;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ndarray::ArrayView2;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub use linear::LinearClassifier;
pub use onnx::OnnxClassifier;

// ============================================================================
// ERRORS
// ============================================================================

/// Startup failure while loading the model artifact
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported model format {0:?} (expected .onnx or .json)")]
    UnsupportedFormat(String),

    #[error("failed to read model {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model: {0}")]
    Invalid(String),

    #[error("ONNX runtime error: {0}")]
    Onnx(String),
}

/// Per-request inference failure
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InferenceError(pub String);

// ============================================================================
// METADATA
// ============================================================================

/// Describes the loaded artifact
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub features: usize,
    pub sha256: String,
    pub loaded_at: DateTime<Utc>,
}

impl ModelMetadata {
    pub fn new(model_path: impl Into<String>, model_type: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            model_path: model_path.into(),
            model_type: model_type.into(),
            features: crate::features::FEATURE_COUNT,
            sha256: sha256.into(),
            loaded_at: Utc::now(),
        }
    }
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A trained binary classifier over feature rows.
///
/// `predict` returns one label per row of `batch`; a non-zero label means
/// phishing.
pub trait Classifier: Send + Sync {
    fn predict(&self, batch: ArrayView2<'_, f32>) -> Result<Vec<i64>, InferenceError>;

    fn metadata(&self) -> &ModelMetadata;
}

// ============================================================================
// LOADING
// ============================================================================

/// Load a classifier from disk, picking the backend by file extension
pub fn load_model(path: impl AsRef<Path>) -> Result<Arc<dyn Classifier>, ModelError> {
    let path = path.as_ref();
    tracing::info!("Loading model from: {}", path.display());

    if !path.is_file() {
        return Err(ModelError::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let classifier: Arc<dyn Classifier> = match extension.as_str() {
        "onnx" => Arc::new(OnnxClassifier::load(path)?),
        "json" => Arc::new(LinearClassifier::load(path)?),
        other => return Err(ModelError::UnsupportedFormat(other.to_string())),
    };

    let meta = classifier.metadata();
    tracing::info!(
        model_type = %meta.model_type,
        sha256 = %meta.sha256,
        "Model loaded successfully"
    );

    Ok(classifier)
}

/// SHA-256 of a file, hex encoded
pub(crate) fn file_sha256(path: &Path) -> Result<String, ModelError> {
    let io_err = |source: std::io::Error| ModelError::Io { path: path.to_path_buf(), source };

    let mut file = fs::File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(io_err)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
