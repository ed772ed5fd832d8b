//! The collaborator seam between the studio and the outside world.
//!
//! Everything the studio sends over the network goes through a
//! [`StudioBackend`]. The production implementation is
//! [`HttpBackend`](crate::http::HttpBackend); tests substitute in-memory fakes.
//! Handles are injected into [`StudioSession`](crate::StudioSession) at
//! construction, there is no process-wide client.

use async_trait::async_trait;
use thiserror::Error;

use lingofy_core::{ChatMessage, ImageReference, SaveResponse, StoreProfile};

/// Errors a backend reports back to the studio.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response (connection refused, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The collaborator answered with a non-success status.
    #[error("server responded with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The `error` (or `message`) field of the response body, if any.
        message: Option<String>,
    },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Human-readable message supplied by the collaborator, if it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Persistence and AI collaborators used by the studio.
#[async_trait]
pub trait StudioBackend: Send + Sync {
    /// Persist a profile whose `product.images` holds the full gallery.
    async fn save(&self, payload: &StoreProfile) -> Result<SaveResponse, BackendError>;

    /// Generate a product image from a text prompt.
    ///
    /// `Ok(None)` means the provider answered but returned no image.
    async fn generate_image(&self, prompt: &str) -> Result<Option<ImageReference>, BackendError>;

    /// Send the chat history and return the assistant's reply.
    async fn chat(&self, history: &[ChatMessage]) -> Result<String, BackendError>;
}
