//! Unified error handling for the API.
//!
//! Every failure is answered with `{ "error": "<message>" }` so the studio
//! can show the message as-is.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use lingofy_core::ErrorBody;

use crate::ai::AiError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// The AI provider failed.
    #[error("{0}")]
    Ai(#[from] AiError),

    /// The request body was not valid JSON for the endpoint.
    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Ai(AiError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            Self::Ai(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidBody(rejection) => rejection.status(),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Provider outages and our own faults go to Sentry; client mistakes don't
        if matches!(
            self,
            Self::Internal(_) | Self::Ai(AiError::Unavailable(_) | AiError::InvalidResponse(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let error = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}
