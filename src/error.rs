use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::core::{AnalysisError, PolicyError};
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read policy file {path}: {source}")]
    PolicyFile {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("invalid input: {0}")]
    Input(String),

    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::Analysis(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PolicyFile { .. }
            | AppError::Json(_)
            | AppError::Policy(_)
            | AppError::Telemetry(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
