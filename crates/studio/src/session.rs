//! A creator's editing session.

use std::sync::Arc;

use lingofy_core::{FieldKind, ImageReference, StoreProfile, apply_field_edit};

use crate::backend::StudioBackend;
use crate::chat::{ChatError, ChatTranscript};
use crate::form::{self, SaveError, SaveStatus, SavedConfirmation};
use crate::generation::{self, GenerationError};
use crate::intake::{self, IntakeError, SelectedFile};

/// Everything the studio edits between two saves.
///
/// Failed operations leave the profile and gallery as they were. Every
/// operation that awaits the backend takes `&mut self`, so a reply is only
/// ever applied by the call that requested it.
pub struct StudioSession {
    backend: Arc<dyn StudioBackend>,
    profile: StoreProfile,
    gallery: Vec<ImageReference>,
    extra_prompt: String,
    save_status: SaveStatus,
    chat: ChatTranscript,
}

impl std::fmt::Debug for StudioSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioSession")
            .field("profile", &self.profile)
            .field("gallery", &self.gallery.len())
            .field("save_status", &self.save_status)
            .finish_non_exhaustive()
    }
}

impl StudioSession {
    /// Start a session with the default profile and an empty gallery.
    #[must_use]
    pub fn new(backend: Arc<dyn StudioBackend>) -> Self {
        Self::with_profile(backend, StoreProfile::default())
    }

    /// Start a session from an existing profile.
    ///
    /// Images already on the profile become the initial gallery.
    #[must_use]
    pub fn with_profile(backend: Arc<dyn StudioBackend>, mut profile: StoreProfile) -> Self {
        let gallery = std::mem::take(&mut profile.product.images);
        Self {
            backend,
            profile,
            gallery,
            extra_prompt: String::new(),
            save_status: SaveStatus::Idle,
            chat: ChatTranscript::new(),
        }
    }

    #[must_use]
    pub const fn profile(&self) -> &StoreProfile {
        &self.profile
    }

    #[must_use]
    pub fn gallery(&self) -> &[ImageReference] {
        &self.gallery
    }

    #[must_use]
    pub const fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    #[must_use]
    pub const fn chat(&self) -> &ChatTranscript {
        &self.chat
    }

    #[must_use]
    pub fn extra_prompt(&self) -> &str {
        &self.extra_prompt
    }

    /// Set the free-text instructions appended to generation prompts.
    pub fn set_extra_prompt(&mut self, text: impl Into<String>) {
        self.extra_prompt = text.into();
    }

    /// The profile as it would be saved, gallery included.
    #[must_use]
    pub fn snapshot(&self) -> StoreProfile {
        self.profile.with_images(self.gallery.clone())
    }

    /// Edit one field. Invalid paths are ignored.
    pub fn apply_edit(&mut self, path: &str, raw: &str, kind: FieldKind) {
        let profile = std::mem::take(&mut self.profile);
        self.profile = apply_field_edit(profile, path, raw, kind);
    }

    /// Validate and append picked files to the gallery.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError`] if any file is refused or unreadable; the
    /// gallery is unchanged.
    pub async fn ingest<F: SelectedFile>(&mut self, files: &[F]) -> Result<usize, IntakeError> {
        let gallery = intake::validate_and_ingest(files, &self.gallery).await?;
        let added = gallery.len() - self.gallery.len();
        self.gallery = gallery;
        Ok(added)
    }

    /// Remove the gallery image at `index`. Out of range is a no-op.
    pub fn remove_image(&mut self, index: usize) {
        let gallery = std::mem::take(&mut self.gallery);
        self.gallery = intake::remove_at(gallery, index);
    }

    /// Generate a product photo and append it to the gallery.
    ///
    /// Returns the new image's gallery index.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if nothing was generated; the gallery is
    /// unchanged.
    pub async fn generate_image(&mut self) -> Result<usize, GenerationError> {
        let extra = Some(self.extra_prompt.as_str()).filter(|s| !s.trim().is_empty());
        let image =
            generation::generate_image(self.backend.as_ref(), &self.profile, extra).await?;
        self.gallery.push(image);
        Ok(self.gallery.len() - 1)
    }

    /// Save the profile with the current gallery.
    ///
    /// The outcome is also recorded in [`Self::save_status`]. If the returned
    /// future is dropped before it completes, the previous status is restored.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] if the save did not go through.
    pub async fn save(&mut self) -> Result<SavedConfirmation, SaveError> {
        let in_flight = SaveInFlight::begin(&mut self.save_status);
        let result = form::save(self.backend.as_ref(), &self.profile, &self.gallery).await;

        in_flight.finish(match &result {
            Ok(confirmation) => SaveStatus::Succeeded(confirmation.clone()),
            Err(err) => SaveStatus::Failed(err.message().to_owned()),
        });
        result
    }

    /// Ask the assistant a question.
    ///
    /// # Errors
    ///
    /// See [`ChatTranscript::send`].
    pub async fn ask(&mut self, input: &str) -> Result<lingofy_core::ChatMessage, ChatError> {
        self.chat.send(self.backend.as_ref(), input).await
    }
}

/// Holds a session's status at `Saving` until the save finishes.
struct SaveInFlight<'a> {
    status: &'a mut SaveStatus,
    previous: Option<SaveStatus>,
}

impl<'a> SaveInFlight<'a> {
    fn begin(status: &'a mut SaveStatus) -> Self {
        let previous = std::mem::replace(status, SaveStatus::Saving);
        Self {
            status,
            previous: Some(previous),
        }
    }

    fn finish(mut self, outcome: SaveStatus) {
        self.previous = None;
        *self.status = outcome;
    }
}

impl Drop for SaveInFlight<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            tracing::debug!("save abandoned before completion");
            *self.status = previous;
        }
    }
}
