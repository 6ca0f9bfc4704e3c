//! HTTP request handlers.

use crate::error::Error;
use crate::output::{PredictResponse, Resolution};
use crate::server::{ApiError, ApiResult, AppState};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the service is up.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /predict (multipart: `image` file, `city` text)
pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<PredictResponse>> {
    let mut image: Option<Vec<u8>> = None;
    let mut city = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        match field.name() {
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                image = Some(bytes.to_vec());
            }
            Some("city") => {
                city = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            }
            _ => {}
        }
    }

    let image = image.ok_or(Error::MissingImage)?;
    let city = state.classifier.parse_city(&city)?;
    let detector = state.detector.clone().ok_or(Error::DetectorUnavailable)?;

    debug!("predict: {} bytes for {city}", image.len());
    let raw = tokio::task::spawn_blocking(move || detector.detect(&image))
        .await
        .map_err(|e| Error::Internal {
            message: format!("detector task failed: {e}"),
        })??;

    Ok(Json(PredictResponse {
        city,
        detections: state.classifier.process(city, &raw),
    }))
}

/// Body of a resolve request.
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    /// City name.
    #[serde(default)]
    pub city: String,
    /// Detected class.
    #[serde(default, alias = "yolo_class")]
    pub detected_class: String,
    /// Chosen follow-up option, or `default`.
    #[serde(default)]
    pub subtype: String,
}

/// POST /resolve
pub async fn resolve(
    State(state): State<AppState>,
    body: Result<Json<ResolveRequest>, JsonRejection>,
) -> ApiResult<Json<Resolution>> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let resolution =
        state
            .classifier
            .resolve(&request.city, &request.detected_class, &request.subtype)?;
    Ok(Json(resolution))
}
