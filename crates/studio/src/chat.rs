//! The in-studio assistant conversation.

use thiserror::Error;

use lingofy_core::ChatMessage;

use crate::backend::{BackendError, StudioBackend};

/// First model turn of every conversation. Never sent to the backend.
pub const CHAT_GREETING: &str = "Hello! I'm the Lingofy assistant. How can I help you today?";

/// Errors from [`ChatTranscript::send`].
#[derive(Debug, Error)]
pub enum ChatError {
    /// Input was empty or whitespace; nothing was sent.
    #[error("message is empty")]
    EmptyMessage,

    /// The backend failed. The apology turn has already been appended.
    #[error("{0}")]
    Backend(String),
}

/// Ordered chat history, starting with the greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTranscript {
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::model(CHAT_GREETING)],
        }
    }

    /// Every turn, greeting included.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The turns sent to the backend: everything after the greeting.
    #[must_use]
    pub fn history(&self) -> &[ChatMessage] {
        self.messages.get(1..).unwrap_or_default()
    }

    /// Send `input` and append the reply.
    ///
    /// On failure a model turn explaining the problem is appended, so the
    /// transcript always ends with a model turn after a send.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::EmptyMessage`] for blank input (nothing is
    /// appended) or [`ChatError::Backend`] if the backend call fails.
    pub async fn send(
        &mut self,
        backend: &dyn StudioBackend,
        input: &str,
    ) -> Result<ChatMessage, ChatError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.messages.push(ChatMessage::user(input));

        match backend.chat(self.history()).await {
            Ok(text) => {
                let reply = ChatMessage::model(text);
                self.messages.push(reply.clone());
                Ok(reply)
            }
            Err(err) => {
                let message = failure_message(&err);
                tracing::warn!(error = %err, "chat request failed");
                self.messages.push(ChatMessage::model(format!(
                    "Sorry, I ran into an issue: {message}"
                )));
                Err(ChatError::Backend(message))
            }
        }
    }
}

fn failure_message(err: &BackendError) -> String {
    match err {
        BackendError::Status {
            message: Some(message),
            ..
        } => message.clone(),
        BackendError::Status { status, .. } => {
            format!("The server responded with status: {status}")
        }
        other => other.to_string(),
    }
}
