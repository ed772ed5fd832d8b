//! Test doubles shared by the crate's unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use lingofy_core::{ChatMessage, ImageReference, SaveResponse, StoreProfile};

use crate::backend::{BackendError, StudioBackend};

/// In-memory backend used across the crate's tests.
#[derive(Default)]
pub struct FakeBackend {
    pub save_result: Mutex<Option<Result<SaveResponse, BackendError>>>,
    pub saved: Mutex<Vec<StoreProfile>>,
    /// Saves never complete while set.
    pub stall_saves: AtomicBool,
    pub image: Mutex<Option<Result<Option<ImageReference>, BackendError>>>,
    pub prompts: Mutex<Vec<String>>,
    pub chat_result: Mutex<Option<Result<String, BackendError>>>,
    pub chat_histories: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeBackend {
    pub fn saving(result: Result<SaveResponse, BackendError>) -> Self {
        let backend = Self::default();
        *backend.save_result.lock().unwrap() = Some(result);
        backend
    }
}

#[async_trait]
impl StudioBackend for FakeBackend {
    async fn save(&self, payload: &StoreProfile) -> Result<SaveResponse, BackendError> {
        self.saved.lock().unwrap().push(payload.clone());
        if self.stall_saves.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.save_result.lock().unwrap().take().unwrap_or(Ok(SaveResponse {
            success: true,
            message: None,
        }))
    }

    async fn generate_image(
        &self,
        prompt: &str,
    ) -> Result<Option<ImageReference>, BackendError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.image.lock().unwrap().take().unwrap_or(Ok(None))
    }

    async fn chat(&self, history: &[ChatMessage]) -> Result<String, BackendError> {
        self.chat_histories.lock().unwrap().push(history.to_vec());
        self.chat_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok("ok".to_owned()))
    }
}

