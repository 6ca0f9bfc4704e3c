//! HTTP error mapping.

use crate::error::Error;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Error returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Failure reported by the classification core or the detector.
    #[error(transparent)]
    Domain(#[from] Error),

    /// Request body could not be read (400).
    #[error("malformed request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Domain(Error::DetectorUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Domain(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Domain(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Domain(e) => e.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        }

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let invalid_city = ApiError::from(Error::InvalidCity {
            city: "atlantis".to_string(),
            supported: "livermore, oakland".to_string(),
        });
        assert_eq!(invalid_city.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid_city.code(), "invalid_city");

        let missing = ApiError::from(Error::NoRuleFound {
            city: "oakland".to_string(),
            class: "paper".to_string(),
            subtype: "lamp".to_string(),
        });
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        assert_eq!(
            ApiError::from(Error::DetectorUnavailable).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(Error::Inference {
                reason: "boom".to_string()
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::BadRequest("eof".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
