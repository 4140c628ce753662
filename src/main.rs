//! One-Shield Phishing Service
//!
//! Classifies a submitted URL as phishing or legitimate with a pre-trained
//! model. Used by the browser extension before navigation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 ONE-SHIELD PHISHING SERVICE              │
//! ├──────────────────────────────────────────────────────────┤
//! │  POST /predict                                           │
//! │     │                                                    │
//! │     ▼                                                    │
//! │  ┌───────────┐   ┌─────────────────┐   ┌──────────────┐  │
//! │  │ Features  │──▶│ Classifier      │──▶│ Verdict JSON │  │
//! │  │ len/https │   │ (ONNX / linear) │   │              │  │
//! │  └───────────┘   └─────────────────┘   └──────────────┘  │
//! │                  loaded once at startup                  │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod detector;
mod error;
mod features;
mod handlers;
mod logging;
mod model;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    logging::init(&config);

    tracing::info!("One-Shield Phishing Service starting...");
    tracing::info!("Environment: {}", config.environment);

    // Load the classifier; no model, no server
    let classifier = match model::load_model(&config.model_path) {
        Ok(classifier) => classifier,
        Err(e) => {
            tracing::error!("Error loading the model: {}", e);
            return Err(e.into());
        }
    };

    // Build application state
    let state = AppState {
        classifier,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn model::Classifier>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
