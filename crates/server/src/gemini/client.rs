//! Gemini API client for chat and image generation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use lingofy_core::{ChatMessage, GeneratedImage};

use crate::ai::{ASSISTANT_INSTRUCTION, AiError, AiModel};
use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    base_url: String,
    chat_model: String,
    image_model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| GeminiError::Config("API key contains invalid characters".to_string()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                chat_model: config.chat_model.clone(),
                image_model: config.image_model.clone(),
            }),
        })
    }

    /// Call `generateContent` on `model`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with an error
    /// status, or the body cannot be parsed.
    #[instrument(skip(self, request), fields(contents = request.contents.len()))]
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{model}:generateContent",
            self.inner.base_url
        );

        let response = self.inner.client.post(url).json(request).send().await?;
        self.handle_response(response).await
    }

    /// Reply to a conversation as the Lingofy assistant.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::EmptyResponse`] if the model produced no text.
    #[instrument(skip_all, fields(model = %self.inner.chat_model, turns = history.len()))]
    pub async fn chat(&self, history: &[ChatMessage]) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: history.iter().map(Content::from).collect(),
            system_instruction: Some(Content::text(None, ASSISTANT_INSTRUCTION)),
            generation_config: None,
        };

        let response = self
            .generate_content(&self.inner.chat_model, &request)
            .await?;
        if let Some(reason) = response.block_reason() {
            return Err(GeminiError::Blocked(reason.to_string()));
        }

        let text = response.text();
        if text.trim().is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(text)
    }

    /// Generate a product image from `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the prompt is blocked.
    #[instrument(skip_all, fields(model = %self.inner.image_model))]
    pub async fn generate_image(
        &self,
        prompt: &str,
    ) -> Result<Option<GeneratedImage>, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig::image_only()),
        };

        let response = self
            .generate_content(&self.inner.image_model, &request)
            .await?;
        if let Some(reason) = response.block_reason() {
            return Err(GeminiError::Blocked(reason.to_string()));
        }

        let image = response.first_image();
        if image.is_none() {
            tracing::warn!(
                finish_reason = ?response.candidates.first().and_then(|c| c.finish_reason.as_deref()),
                "model returned no image"
            );
        }
        Ok(image)
    }

    /// Parse a successful response or map an error status.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return GeminiError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return GeminiError::Unauthorized("API key rejected".to_string());
        }

        match response.text().await {
            Ok(body) => {
                let message = serde_json::from_str::<ApiErrorResponse>(&body)
                    .map_or(body, |api_error| api_error.error.message);
                GeminiError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
            Err(e) => GeminiError::Http(e),
        }
    }
}

#[async_trait]
impl AiModel for GeminiClient {
    async fn chat(&self, history: &[ChatMessage]) -> Result<String, AiError> {
        Ok(Self::chat(self, history).await?)
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<GeneratedImage>, AiError> {
        Ok(Self::generate_image(self, prompt).await?)
    }
}
