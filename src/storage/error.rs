//! Errors raised by the storage client.

use thiserror::Error;

/// Message shown when a failure carries no message of its own.
pub const GENERIC_UPLOAD_FAILURE: &str = "Upload failed";

/// Storage client error type.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Client could not be built from the given configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the service.
        message: String,
    },

    /// Upload rejected for any other reason.
    #[error("{0}")]
    Upload(String),

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl StorageError {
    /// Human-readable message for display next to the upload widget.
    ///
    /// Prefers the error's own message and falls back to
    /// [`GENERIC_UPLOAD_FAILURE`] when there is none.
    #[must_use]
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Api { message, .. } | Self::Upload(message) => message.trim().to_string(),
            other => other.to_string(),
        };
        if message.is_empty() {
            GENERIC_UPLOAD_FAILURE.to_string()
        } else {
            message
        }
    }
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
