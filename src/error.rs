//! HTTP-facing errors.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors returned by request handlers.
///
/// Upload failures, unreadable upload bodies included, are shown in the
/// widget's error banner; handlers turn them into HTML, not into this JSON.
#[derive(Error, Debug)]
pub enum AppError {
    /// The multipart body could not be read.
    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    /// Requested resource does not exist.
    #[error("Not Found: {0}")]
    NotFound(String),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            // 413 when the body limit was hit, 400 otherwise
            AppError::Multipart(e) => match e.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Message for the upload widget's error banner.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Multipart(_) if self.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                "File is too large to upload".to_string()
            }
            AppError::Multipart(_) => "The selected file could not be read".to_string(),
            AppError::NotFound(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Multipart(e) => e.body_text(),
            AppError::NotFound(msg) => msg,
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
