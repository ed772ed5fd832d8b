//! Google Gemini integration.
//!
//! Speaks the `generateContent` REST API directly with `reqwest`. Chat uses
//! the configured chat model with the assistant system instruction; image
//! generation uses the image model with `responseModalities: ["IMAGE"]`.

mod client;
mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::{ApiError, ApiErrorResponse, GeminiError};
