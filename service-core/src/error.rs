use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Forbidden: {0}")]
    Forbidden(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// Plain-text body for 403 responses.
pub const FORBIDDEN_BODY: &str = "Forbidden";

/// Plain-text body for 500 responses. The cause is logged, never returned.
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        match self {
            AppError::ValidationError(err) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Validation error".to_string(),
                    details: Some(err.to_string()),
                }),
            )
                .into_response(),
            AppError::BadRequest(err) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Bad request".to_string(),
                    details: Some(err.to_string()),
                }),
            )
                .into_response(),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, FORBIDDEN_BODY).into_response(),
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
            AppError::ConfigError(err) => {
                tracing::error!(error = %err, "Configuration error surfaced in a request");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
        }
    }
}
