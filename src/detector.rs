//! Phishing detection: URL → features → model → verdict

use ndarray::Array2;
use serde::Serialize;

use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::model::Classifier;
use crate::{AppError, AppResult};

pub const PHISHING_MESSAGE: &str = "Warning! This is a Phishing Website.";
pub const LEGITIMATE_MESSAGE: &str = "This is a Legitimate Website.";

/// Response body for a successful prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub url: String,
    pub is_phishing: bool,
    pub message: &'static str,
}

impl Verdict {
    pub fn new(url: String, is_phishing: bool) -> Self {
        let message = if is_phishing { PHISHING_MESSAGE } else { LEGITIMATE_MESSAGE };
        Self { url, is_phishing, message }
    }
}

/// Classify one URL with the loaded model
pub fn classify(classifier: &dyn Classifier, url: String) -> AppResult<Verdict> {
    let features = FeatureVector::extract(&url);

    let batch = Array2::from_shape_vec((1, FEATURE_COUNT), features.as_row().to_vec())
        .map_err(|e| AppError::Prediction(format!("Array error: {}", e)))?;

    let labels = classifier.predict(batch.view())?;
    let label = labels
        .first()
        .copied()
        .ok_or_else(|| AppError::Prediction("model returned no prediction".to_string()))?;

    let is_phishing = label != 0;
    tracing::debug!(
        url = %url,
        url_length = features.url_length,
        is_https = features.is_https,
        is_phishing,
        "URL classified"
    );

    Ok(Verdict::new(url, is_phishing))
}
