//! `lingofy generate` - produce a product photo without saving.

use std::io::Write;
use std::path::{Path, PathBuf};

use lingofy_studio::{StudioBackend, generate_image};

use super::{CliError, load_profile};

/// Generate a photo for the profile's product.
///
/// With `image_out` the decoded bytes are written there and a short summary
/// is printed; otherwise the image is printed as a data URL.
///
/// # Errors
///
/// Returns an error if the profile cannot be loaded, nothing was generated,
/// or the output cannot be written.
pub async fn run(
    backend: &dyn StudioBackend,
    profile: Option<&Path>,
    prompt: Option<&str>,
    image_out: Option<PathBuf>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let profile = load_profile(profile).await?;
    let image = generate_image(backend, &profile, prompt).await?;

    let Some(path) = image_out else {
        return writeln!(out, "{image}").map_err(CliError::Output);
    };

    let bytes = image.decode()?;
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
    writeln!(
        out,
        "{} ({} bytes) written to {}",
        image.mime_type(),
        bytes.len(),
        path.display()
    )
    .map_err(CliError::Output)
}
