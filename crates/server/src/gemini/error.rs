//! Error types for the Gemini API client.

use thiserror::Error;

use crate::ai::AiError;

/// Errors that can occur when interacting with the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gemini returned an error status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The API key was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The prompt was blocked by safety filters.
    #[error("prompt blocked: {0}")]
    Blocked(String),

    /// The model returned no usable content.
    #[error("empty response")]
    EmptyResponse,

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The client could not be configured.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Error body returned by Google APIs.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    pub message: String,
    /// Canonical status name, e.g. `INVALID_ARGUMENT`.
    #[serde(default)]
    pub status: Option<String>,
}

impl From<GeminiError> for AiError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::RateLimited(secs) => Self::RateLimited(secs),
            GeminiError::Api { status, message } if status < 500 => Self::Rejected(message),
            GeminiError::Unauthorized(_) => {
                Self::Rejected("the server's AI credentials were rejected".to_string())
            }
            GeminiError::Blocked(reason) => Self::Rejected(format!("prompt blocked ({reason})")),
            GeminiError::EmptyResponse | GeminiError::Parse(_) => {
                Self::InvalidResponse(err.to_string())
            }
            GeminiError::Http(_) | GeminiError::Api { .. } | GeminiError::Config(_) => {
                Self::Unavailable(err.to_string())
            }
        }
    }
}
