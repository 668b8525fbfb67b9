//! Error responses for the HTTP API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::error::ScreeningError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("geocoding failed; verify address")]
    GeocodeFailed,

    #[error("{0}")]
    Render(String),
}

impl From<ScreeningError> for ApiError {
    fn from(err: ScreeningError) -> Self {
        match err {
            ScreeningError::InputInvalid(msg) => ApiError::InvalidRequest(msg),
            ScreeningError::GeocodeUnavailable => ApiError::GeocodeFailed,
            ScreeningError::RenderFailure(e) => ApiError::Render(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Client errors use `detail`, server errors use `error`, matching what
        // the web client reads for each.
        let (status, body) = match &self {
            ApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "detail": msg }))
            }
            ApiError::GeocodeFailed => (
                StatusCode::NOT_FOUND,
                json!({ "detail": self.to_string() }),
            ),
            ApiError::Render(msg) => {
                tracing::error!("Report rendering failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}
