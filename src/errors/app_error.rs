use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::core::tts::TTSError;

/// Errors surfaced by HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("too many images: {got} uploaded, at most {max} allowed")]
    TooManyImages { max: usize, got: usize },

    #[error("invalid multipart body: {0}")]
    Multipart(String),

    #[error("request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("speech synthesis failed: {0}")]
    Tts(#[from] TTSError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::TooManyImages { .. } | AppError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Tts(TTSError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Tts(TTSError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Tts(TTSError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Tts(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::Multipart(e.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
