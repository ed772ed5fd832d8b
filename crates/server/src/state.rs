//! Application state shared across handlers.

use std::sync::Arc;

use crate::ai::AiModel;

/// Application state shared across all handlers.
///
/// Cheap to clone; the AI handle is shared.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    ai: Arc<dyn AiModel>,
}

impl AppState {
    /// Build state around an AI provider.
    #[must_use]
    pub fn new(ai: Arc<dyn AiModel>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { ai }),
        }
    }

    /// The AI provider.
    #[must_use]
    pub fn ai(&self) -> &dyn AiModel {
        self.inner.ai.as_ref()
    }
}
