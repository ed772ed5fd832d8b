//! The AI provider seam.
//!
//! Handlers only see [`AiModel`]. The production implementation is
//! [`GeminiClient`](crate::gemini::GeminiClient); it is built once in `main`
//! and injected through [`AppState`](crate::state::AppState).

use async_trait::async_trait;
use thiserror::Error;

use lingofy_core::{ChatMessage, GeneratedImage};

/// System instruction for the in-studio assistant.
pub const ASSISTANT_INSTRUCTION: &str = "You are a friendly AI assistant for Lingofy, an e-commerce platform for creators. Help creators manage their online store. Keep answers concise.";

/// Provider-independent AI failures.
#[derive(Debug, Error)]
pub enum AiError {
    /// The provider could not be reached or failed internally.
    #[error("AI provider unavailable: {0}")]
    Unavailable(String),

    /// The provider is throttling us.
    #[error("AI provider rate limit reached, retry after {0} seconds")]
    RateLimited(u64),

    /// The provider refused the request (bad input, safety block, auth).
    #[error("AI provider rejected the request: {0}")]
    Rejected(String),

    /// The provider answered with something we could not use.
    #[error("AI provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Chat and image generation.
#[async_trait]
pub trait AiModel: Send + Sync {
    /// Reply to a conversation whose last turn is from the user.
    async fn chat(&self, history: &[ChatMessage]) -> Result<String, AiError>;

    /// Generate an image. `Ok(None)` when the model returned no image part.
    async fn generate_image(&self, prompt: &str) -> Result<Option<GeneratedImage>, AiError>;
}
