//! HTTP backend talking to `lingofy-server`.
//!
//! Maps the server's JSON API onto [`StudioBackend`]. Non-success statuses are
//! surfaced as [`BackendError::Status`] with the body's `error` field (or
//! `message`, for save responses) so callers can show it to the creator.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use lingofy_core::{
    ApiStatus, ChatMessage, ChatReply, ChatRequest, GenerateImageRequest, GenerateImageResponse,
    ImageReference, SaveResponse, StoreProfile,
};

use crate::backend::{BackendError, StudioBackend};
use crate::config::StudioConfig;

const STATUS_PATH: &str = "/api/v1/test";
const SAVE_PATH: &str = "/api/v1/save";
const CHAT_PATH: &str = "/api/v1/chat";
const GENERATE_IMAGE_PATH: &str = "/api/v1/generate-image";

/// Studio backend over HTTP.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HttpBackend {
    inner: Arc<HttpBackendInner>,
}

struct HttpBackendInner {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a backend for the server at `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StudioConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpBackendInner {
                client,
                base_url: config.api_url.clone(),
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Check that the server is up.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or unhealthy.
    #[instrument(skip(self), fields(base_url = %self.inner.base_url))]
    pub async fn status(&self) -> Result<ApiStatus, BackendError> {
        let response = self
            .inner
            .client
            .get(self.endpoint(STATUS_PATH)?)
            .send()
            .await?;
        read_json(response).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| BackendError::Transport(format!("invalid endpoint {path}: {e}")))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl StudioBackend for HttpBackend {
    #[instrument(skip_all, fields(images = payload.product.images.len()))]
    async fn save(&self, payload: &StoreProfile) -> Result<SaveResponse, BackendError> {
        self.post_json(SAVE_PATH, payload).await
    }

    #[instrument(skip_all)]
    async fn generate_image(&self, prompt: &str) -> Result<Option<ImageReference>, BackendError> {
        let request = GenerateImageRequest {
            prompt: prompt.to_owned(),
        };
        let response: GenerateImageResponse = self.post_json(GENERATE_IMAGE_PATH, &request).await?;

        response
            .image
            .filter(|image| !image.data.is_empty())
            .map(|image| ImageReference::from_base64(image.mime_type, image.data))
            .transpose()
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    #[instrument(skip_all, fields(turns = history.len()))]
    async fn chat(&self, history: &[ChatMessage]) -> Result<String, BackendError> {
        let request = ChatRequest {
            messages: history.to_vec(),
        };
        let reply: ChatReply = self.post_json(CHAT_PATH, &request).await?;
        Ok(reply.text)
    }
}

/// Decode a JSON response, turning error statuses into [`BackendError::Status`].
async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, BackendError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "server returned error status");
        return Err(BackendError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Extract a human-readable message from an error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .into_iter()
        .find_map(|key| value.get(key)?.as_str())
        .filter(|message| !message.trim().is_empty())
        .map(str::to_owned)
}
