//! Integration tests for Lingofy.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lingofy-integration-tests
//! ```
//!
//! Each test starts its own server with [`TestServer::spawn`] on an ephemeral
//! port. The AI provider is a [`ScriptedAi`], so nothing leaves the machine.
//!
//! # Test Categories
//!
//! - `studio_flow` - A studio session against the real router
//! - `save_failures` - Save errors surfaced from the collaborator
//! - `image_intake` - Files from disk through validation into a save

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use axum::http::HeaderValue;
use tokio::task::JoinHandle;
use url::Url;

use lingofy_core::{ChatMessage, GeneratedImage};
use lingofy_server::ai::{AiError, AiModel};
use lingofy_server::{AppState, build_app};
use lingofy_studio::{HttpBackend, StudioConfig};

/// Origin the test servers admit through CORS.
pub const STUDIO_ORIGIN: &str = "http://localhost:5173";

/// AI provider with canned answers that records what it was asked.
#[derive(Debug, Default)]
pub struct ScriptedAi {
    reply: String,
    image: Option<GeneratedImage>,
    histories: Mutex<Vec<Vec<ChatMessage>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedAi {
    /// Answer every chat turn with `reply` and every image request with `image`.
    #[must_use]
    pub fn new(reply: impl Into<String>, image: Option<GeneratedImage>) -> Self {
        Self {
            reply: reply.into(),
            image,
            ..Self::default()
        }
    }

    /// Chat histories received so far, oldest first.
    pub fn histories(&self) -> Vec<Vec<ChatMessage>> {
        self.histories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Image prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AiModel for ScriptedAi {
    async fn chat(&self, history: &[ChatMessage]) -> Result<String, AiError> {
        self.histories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(history.to_vec());
        Ok(self.reply.clone())
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<GeneratedImage>, AiError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_owned());
        Ok(self.image.clone())
    }
}

/// A server running in the background for the lifetime of the value.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Bind to `127.0.0.1:0` and serve the full router.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(ai: Arc<dyn AiModel>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let app = build_app(AppState::new(ai), HeaderValue::from_static(STUDIO_ORIGIN));
        let handle = tokio::spawn(async move {
            // Aborted on drop; serve errors only matter to the test that hits them
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, handle }
    }

    /// Base URL of the running server.
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Invalid server URL")
    }

    /// A studio backend pointed at this server.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn backend(&self) -> HttpBackend {
        HttpBackend::new(&StudioConfig::new(self.url())).expect("Failed to build backend")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
