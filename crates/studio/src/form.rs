//! Saving the edited profile.
//!
//! The form state itself lives in [`lingofy_core::StoreProfile`] and is edited
//! with [`lingofy_core::apply_field_edit`]. This module owns the save contract:
//! merge the gallery into the profile, hand it to the backend once, and turn
//! whatever comes back into a message the creator can act on.

use thiserror::Error;

use lingofy_core::{ImageReference, SAVE_SUCCESS_MESSAGE, StoreProfile};

use crate::backend::{BackendError, StudioBackend};

/// Shown when the backend gives no usable reason for a failed save.
pub const GENERIC_SAVE_ERROR: &str = "An error occurred while saving. Please try again.";

/// Shown when the backend rejects a save without a message.
pub const REJECTED_SAVE_ERROR: &str = "Failed to save data.";

/// A save the backend accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedConfirmation {
    pub message: String,
}

/// A save that did not go through.
///
/// The profile and gallery are untouched, so the creator can retry without
/// re-entering anything.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SaveError {
    message: String,
    #[source]
    source: Option<BackendError>,
}

impl SaveError {
    /// The message to display.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn rejected(message: Option<String>) -> Self {
        Self {
            message: message.unwrap_or_else(|| REJECTED_SAVE_ERROR.to_owned()),
            source: None,
        }
    }
}

impl From<BackendError> for SaveError {
    fn from(err: BackendError) -> Self {
        Self {
            message: err
                .server_message()
                .map_or_else(|| GENERIC_SAVE_ERROR.to_owned(), str::to_owned),
            source: Some(err),
        }
    }
}

/// Lifecycle of the most recent save in a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Succeeded(SavedConfirmation),
    Failed(String),
}

impl SaveStatus {
    /// Whether a save is currently in flight.
    #[must_use]
    pub const fn is_saving(&self) -> bool {
        matches!(self, Self::Saving)
    }
}

/// Save `profile` with `images` as its product gallery.
///
/// Makes exactly one backend call; retrying is up to the caller.
///
/// # Errors
///
/// Returns [`SaveError`] if the backend is unreachable, answers with an error
/// status, or reports `success: false`. The message is taken from the
/// backend's response body when it supplies one.
pub async fn save(
    backend: &dyn StudioBackend,
    profile: &StoreProfile,
    images: &[ImageReference],
) -> Result<SavedConfirmation, SaveError> {
    let payload = profile.with_images(images.to_vec());

    match backend.save(&payload).await {
        Ok(response) if response.success => {
            let message = response
                .message
                .unwrap_or_else(|| SAVE_SUCCESS_MESSAGE.to_owned());
            tracing::info!(images = images.len(), "profile saved");
            Ok(SavedConfirmation { message })
        }
        Ok(response) => {
            tracing::warn!(message = ?response.message, "save rejected by server");
            Err(SaveError::rejected(response.message))
        }
        Err(err) => {
            tracing::warn!(error = %err, "save failed");
            Err(err.into())
        }
    }
}
