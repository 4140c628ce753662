//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::model::InferenceError;

pub type AppResult<T> = Result<T, AppError>;

/// Per-request failures of the prediction endpoint
#[derive(Debug, Error)]
pub enum AppError {
    /// Caller did not supply a usable `url`
    #[error("No URL provided in the request body.")]
    MissingInput,

    /// Body exceeded the extractor limit
    #[error("Request body too large.")]
    PayloadTooLarge,

    /// Feature extraction or model invocation failed
    #[error("An internal server error occurred: {0}")]
    Prediction(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingInput => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::Prediction(err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_message() {
        let err = AppError::MissingInput;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "No URL provided in the request body.");
    }

    #[test]
    fn test_prediction_error_message() {
        let err: AppError = InferenceError("Inference failed: shape mismatch".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "An internal server error occurred: Inference failed: shape mismatch"
        );
    }
}
