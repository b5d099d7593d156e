use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    InternalServerError,
}

impl AppError {
    /// True for the upstream "record does not exist" signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound | AppError::Http { status: 404, .. })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            return AppError::Network(format!("Unable to reach the course API: {}", e));
        }
        if e.is_decode() {
            return AppError::Api(format!("Failed to read response body: {}", e));
        }
        match e.status() {
            Some(status) => AppError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Request failed").to_string(),
            },
            None => AppError::Network(e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut errors = None;
        let (status, error_message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Validation(list) => {
                let message = format!("{} field(s) failed validation", list.len());
                errors = Some(list);
                (StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            AppError::Network(msg) => {
                error!("network error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::Http { status, message } => {
                error!("upstream returned {}: {}", status, message);
                (StatusCode::BAD_GATEWAY, message)
            }
            AppError::Api(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Decode(e) => {
                error!("decode error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream returned an unreadable response".to_string(),
                )
            }
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
            errors,
        });

        (status, body).into_response()
    }
}
