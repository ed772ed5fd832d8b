//! JSON bodies exchanged with the Lingofy server.
//!
//! The studio client and the axum handlers both use these, so the wire format
//! is defined exactly once.

use serde::{Deserialize, Serialize};

use super::image::ImageReference;

/// Message returned by `GET /api/v1/test` while the server is up.
pub const API_RUNNING_MESSAGE: &str = "🚀 Lingofy API is running!";

/// Default confirmation returned by `POST /api/v1/save`.
pub const SAVE_SUCCESS_MESSAGE: &str = "Data saved successfully!";

/// Response of `GET /api/v1/test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub message: String,
}

/// Response of `POST /api/v1/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error body returned by every endpoint on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// A single chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// A turn written by the creator.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// A turn written by the assistant.
    #[must_use]
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
        }
    }
}

/// Request body of `POST /api/v1/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Response of `POST /api/v1/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
}

/// Request body of `POST /api/v1/generate-image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
}

/// Response of `POST /api/v1/generate-image`.
///
/// `image` is `null` when the provider answered successfully but produced no
/// image data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateImageResponse {
    #[serde(default)]
    pub image: Option<GeneratedImage>,
}

/// An image produced by the AI provider, as base64 plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: String,
}

impl From<ImageReference> for GeneratedImage {
    fn from(image: ImageReference) -> Self {
        Self {
            mime_type: image.mime_type().to_owned(),
            data: image.data().to_owned(),
        }
    }
}
