//! Linear classifier loaded from portable JSON weights
//!
//! ```json
//! {
//!   "model_type": "logistic_regression",
//!   "coefficients": [0.031, -1.9],
//!   "intercept": -0.4,
//!   "threshold": 0.5
//! }
//! ```

use std::path::Path;

use ndarray::{Array1, ArrayView2};
use serde::Deserialize;

use super::{file_sha256, Classifier, InferenceError, ModelError, ModelMetadata};
use crate::features::FEATURE_COUNT;

/// Serialized weights
#[derive(Debug, Clone, Deserialize)]
pub struct LinearWeights {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    pub coefficients: Vec<f32>,
    #[serde(default)]
    pub intercept: f32,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

fn default_model_type() -> String {
    "logistic_regression".to_string()
}

fn default_threshold() -> f32 {
    0.5
}

/// Logistic regression: phishing when `sigmoid(w·x + b) >= threshold`
#[derive(Debug)]
pub struct LinearClassifier {
    coefficients: Array1<f32>,
    intercept: f32,
    threshold: f32,
    metadata: ModelMetadata,
}

impl LinearClassifier {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let weights: LinearWeights = serde_json::from_str(&raw)
            .map_err(|e| ModelError::Invalid(format!("bad weights file: {}", e)))?;

        let sha256 = file_sha256(path)?;
        Self::from_weights(weights, ModelMetadata::new(path.display().to_string(), "", sha256))
    }

    /// Validate weights and build the classifier. `metadata.model_type` is
    /// overwritten with the weights' own type.
    pub fn from_weights(weights: LinearWeights, mut metadata: ModelMetadata) -> Result<Self, ModelError> {
        if weights.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "expected {} coefficients, got {}",
                FEATURE_COUNT,
                weights.coefficients.len()
            )));
        }
        let all_finite = weights.coefficients.iter().all(|w| w.is_finite())
            && weights.intercept.is_finite();
        if !all_finite {
            return Err(ModelError::Invalid("non-finite weight".to_string()));
        }
        if !(weights.threshold > 0.0 && weights.threshold < 1.0) {
            return Err(ModelError::Invalid(format!(
                "threshold must be in (0, 1), got {}",
                weights.threshold
            )));
        }

        metadata.model_type = weights.model_type;
        Ok(Self {
            coefficients: Array1::from(weights.coefficients),
            intercept: weights.intercept,
            threshold: weights.threshold,
            metadata,
        })
    }

    /// Phishing probability for every row
    pub fn probabilities(&self, batch: ArrayView2<'_, f32>) -> Result<Array1<f32>, InferenceError> {
        if batch.ncols() != FEATURE_COUNT {
            return Err(InferenceError(format!(
                "expected {} features per row, got {}",
                FEATURE_COUNT,
                batch.ncols()
            )));
        }

        let logits = batch.dot(&self.coefficients) + self.intercept;
        Ok(logits.mapv(|z| 1.0 / (1.0 + (-z).exp())))
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, batch: ArrayView2<'_, f32>) -> Result<Vec<i64>, InferenceError> {
        let probs = self.probabilities(batch)?;
        Ok(probs.iter().map(|&p| i64::from(p >= self.threshold)).collect())
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn classifier(coefficients: Vec<f32>, intercept: f32) -> Result<LinearClassifier, ModelError> {
        let weights = LinearWeights {
            model_type: default_model_type(),
            coefficients,
            intercept,
            threshold: 0.5,
        };
        LinearClassifier::from_weights(weights, ModelMetadata::new("<memory>", "", ""))
    }

    #[test]
    fn test_long_plain_http_is_phishing() {
        // longer URLs push towards phishing, https pulls away
        let model = classifier(vec![0.1, -5.0], -4.0).unwrap();

        let batch = array![[80.0f32, 0.0], [19.0, 1.0], [60.0, 1.0]];
        assert_eq!(model.predict(batch.view()).unwrap(), vec![1, 0, 0]);
    }

    #[test]
    fn test_probabilities_are_sigmoid() {
        let model = classifier(vec![0.0, 0.0], 0.0).unwrap();
        let probs = model.probabilities(array![[42.0f32, 1.0]].view()).unwrap();
        assert!((probs[0] - 0.5).abs() < 1e-6);
        // exactly on the threshold counts as phishing
        assert_eq!(model.predict(array![[42.0f32, 1.0]].view()).unwrap(), vec![1]);
    }

    #[test]
    fn test_wrong_coefficient_count() {
        let err = classifier(vec![1.0, 2.0, 3.0], 0.0).unwrap_err();
        assert!(err.to_string().contains("expected 2 coefficients"));
    }

    #[test]
    fn test_non_finite_weights_rejected() {
        assert!(classifier(vec![f32::NAN, 0.0], 0.0).is_err());
        assert!(classifier(vec![0.0, 0.0], f32::INFINITY).is_err());
    }

    #[test]
    fn test_wrong_batch_width() {
        let model = classifier(vec![0.1, -1.0], 0.0).unwrap();
        let err = model.predict(array![[1.0f32, 2.0, 3.0]].view()).unwrap_err();
        assert!(err.0.contains("expected 2 features"));
    }

    #[test]
    fn test_weights_defaults() {
        let weights: LinearWeights = serde_json::from_str(r#"{"coefficients": [0.5, -1.0]}"#).unwrap();
        assert_eq!(weights.model_type, "logistic_regression");
        assert_eq!(weights.intercept, 0.0);
        assert_eq!(weights.threshold, 0.5);
    }
}
