//! ONNX Runtime backend
//!
//! Expects a classifier exported with a single float input of shape
//! `[batch, 2]` whose first output is the predicted label (as produced by
//! sklearn-onnx). Models whose first output is a float are accepted too:
//! the value is read as a phishing probability (or a 0.0/1.0 label) and
//! rows scoring at least `SCORE_THRESHOLD` are phishing.

use std::path::Path;

use ndarray::ArrayView2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::{file_sha256, Classifier, InferenceError, ModelError, ModelMetadata};
use crate::features::FEATURE_COUNT;

/// Cut-off for float outputs
pub const SCORE_THRESHOLD: f32 = 0.5;

pub struct OnnxClassifier {
    // `Session::run` needs `&mut`, so calls are serialized
    session: Mutex<Session>,
    output_name: String,
    metadata: ModelMetadata,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let session = Session::builder()
            .map_err(|e| ModelError::Onnx(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Onnx(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| ModelError::Onnx(format!("Failed to load model: {}", e)))?;

        if session.inputs.len() != 1 {
            return Err(ModelError::Invalid(format!(
                "expected exactly one model input, found {}",
                session.inputs.len()
            )));
        }

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelError::Invalid("No output defined".to_string()))?;

        tracing::debug!(
            input = %session.inputs[0].name,
            output = %output_name,
            "ONNX session ready"
        );

        let sha256 = file_sha256(path)?;
        Ok(Self {
            session: Mutex::new(session),
            output_name,
            metadata: ModelMetadata::new(path.display().to_string(), "onnx", sha256),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, batch: ArrayView2<'_, f32>) -> Result<Vec<i64>, InferenceError> {
        if batch.ncols() != FEATURE_COUNT {
            return Err(InferenceError(format!(
                "expected {} features per row, got {}",
                FEATURE_COUNT,
                batch.ncols()
            )));
        }
        let rows = batch.nrows();

        let input_tensor = Value::from_array(batch.to_owned())
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| InferenceError("No output".to_string()))?;

        let labels: Vec<i64> = match output.try_extract_tensor::<i64>() {
            Ok((_, data)) => data.to_vec(),
            Err(_) => {
                let (_, data) = output
                    .try_extract_tensor::<f32>()
                    .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;
                labels_from_scores(data)
            }
        };

        if labels.len() < rows {
            return Err(InferenceError(format!(
                "model returned {} labels for {} rows",
                labels.len(),
                rows
            )));
        }

        Ok(labels)
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

fn labels_from_scores(scores: &[f32]) -> Vec<i64> {
    scores.iter().map(|&p| i64::from(p >= SCORE_THRESHOLD)).collect()
}
