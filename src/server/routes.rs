//! Router construction and server startup.

use crate::classify::WasteClassifier;
use crate::constants::server::MAX_UPLOAD_BYTES;
use crate::error::{Error, Result};
use crate::inference::Detector;
use crate::server::handlers;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Rule-based classifier.
    pub classifier: WasteClassifier,
    /// Detector, absent when no model is configured.
    pub detector: Option<Arc<dyn Detector>>,
}

impl AppState {
    /// Create handler state.
    pub fn new(classifier: WasteClassifier, detector: Option<Arc<dyn Detector>>) -> Self {
        Self {
            classifier,
            detector,
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/resolve", post(handlers::resolve))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the API until Ctrl+C.
pub async fn run(state: AppState, host: &str, port: u16) -> Result<()> {
    match state.detector {
        Some(ref detector) => info!("Detector: {}", detector.name()),
        None => warn!("No detector configured; /predict will answer 503"),
    }

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Server {
            reason: format!("failed to bind to {addr}: {e}"),
        })?;
    info!("Listening on http://{addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server {
            reason: e.to_string(),
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
