//! Prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::detector::{self, Verdict};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Classify the URL in the request body
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<Verdict>> {
    let url = match payload {
        Ok(Json(req)) => req.url.filter(|u| !u.is_empty()),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!("Predict body rejected: {}", rejection);
            return Err(AppError::PayloadTooLarge);
        }
        Err(rejection) => {
            tracing::warn!("Unusable predict body: {}", rejection);
            None
        }
    }
    .ok_or(AppError::MissingInput)?;

    let classifier = state.classifier.clone();
    let request_url = url.clone();

    let result = tokio::task::spawn_blocking(move || detector::classify(classifier.as_ref(), url))
        .await
        .map_err(|e| AppError::Prediction(format!("prediction worker failed: {}", e)))
        .and_then(|verdict| verdict);

    match result {
        Ok(verdict) => Ok(Json(verdict)),
        Err(e) => {
            tracing::error!(url = %request_url, "Error during prediction: {}", e);
            Err(e)
        }
    }
}
