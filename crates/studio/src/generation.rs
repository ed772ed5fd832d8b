//! AI product photos.

use thiserror::Error;

use lingofy_core::{ImageReference, StoreProfile, image_prompt};

use crate::backend::{BackendError, StudioBackend};

/// Errors from [`generate_image`].
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The provider answered but produced no image.
    #[error("no image returned")]
    NoImage,

    #[error("image generation failed: {0}")]
    Backend(#[from] BackendError),
}

impl GenerationError {
    /// Message to show the creator.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NoImage => "The AI did not return an image. Please try again.".to_owned(),
            Self::Backend(err) => err
                .server_message()
                .map_or_else(|| self.to_string(), str::to_owned),
        }
    }
}

/// Generate a product photo for `profile`'s product.
///
/// The caller decides what to do with the result; nothing is added to a
/// gallery here.
///
/// # Errors
///
/// Returns [`GenerationError::NoImage`] if the provider returns no image data,
/// or [`GenerationError::Backend`] if the request fails.
pub async fn generate_image(
    backend: &dyn StudioBackend,
    profile: &StoreProfile,
    extra: Option<&str>,
) -> Result<ImageReference, GenerationError> {
    let prompt = image_prompt(profile, extra);
    tracing::debug!(prompt_len = prompt.len(), "requesting product image");

    let image = backend
        .generate_image(&prompt)
        .await?
        .ok_or(GenerationError::NoImage)?;

    tracing::info!(mime_type = image.mime_type(), "product image generated");
    Ok(image)
}
