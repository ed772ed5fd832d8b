//! Image intake: validate picked files and turn them into gallery entries.
//!
//! Validation is all-or-nothing. If any file in a batch is too large or of an
//! unsupported type, nothing is read and the first offending file is reported.
//! Only when every file passes are they read (concurrently) and appended to
//! the gallery in the order they were picked.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::try_join_all;
use thiserror::Error;
use tokio::io::AsyncReadExt;

use lingofy_core::ImageReference;

pub use lingofy_core::remove_at;

/// Largest accepted file, inclusive.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// A file the creator picked for upload.
///
/// `mime_type` and `size` are what the picker declared; they are checked
/// before any bytes are read.
#[async_trait]
pub trait SelectedFile: Send + Sync {
    fn name(&self) -> &str;
    fn mime_type(&self) -> &str;
    fn size(&self) -> u64;
    async fn read(&self) -> io::Result<Vec<u8>>;
}

#[async_trait]
impl<T: SelectedFile + ?Sized> SelectedFile for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn mime_type(&self) -> &str {
        (**self).mime_type()
    }

    fn size(&self) -> u64 {
        (**self).size()
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        (**self).read().await
    }
}

/// A file on the local filesystem.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    mime_type: &'static str,
    size: u64,
}

impl DiskFile {
    /// Stat `path` and infer its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file's metadata cannot be read.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self {
            mime_type: mime_from_extension(&path),
            size: metadata.len(),
            name,
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SelectedFile for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        self.mime_type
    }

    fn size(&self) -> u64 {
        self.size
    }

    /// Reads at most one byte past [`MAX_IMAGE_BYTES`], so a file that grew
    /// after [`DiskFile::open`] is caught without loading all of it.
    async fn read(&self) -> io::Result<Vec<u8>> {
        let file = tokio::fs::File::open(&self.path).await?;
        let mut bytes = Vec::new();
        file.take(MAX_IMAGE_BYTES + 1).read_to_end(&mut bytes).await?;
        Ok(bytes)
    }
}

/// A file already held in memory.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

#[async_trait]
impl SelectedFile for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

fn mime_from_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Why a file was refused before reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File \"{name}\" exceeds the 5MB size limit.")]
    TooLarge { name: String, size: u64 },

    #[error("File type for \"{name}\" is not supported (use JPG, PNG, WEBP).")]
    UnsupportedType { name: String, mime_type: String },
}

/// Errors from [`validate_and_ingest`].
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to read \"{name}\": {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Check one file against the size and type policy.
///
/// # Errors
///
/// Returns the reason the file is refused. Size is checked before type.
pub fn validate(file: &(impl SelectedFile + ?Sized)) -> Result<(), ValidationError> {
    if file.size() > MAX_IMAGE_BYTES {
        return Err(ValidationError::TooLarge {
            name: file.name().to_owned(),
            size: file.size(),
        });
    }

    if !ALLOWED_MIME_TYPES.contains(&file.mime_type()) {
        return Err(ValidationError::UnsupportedType {
            name: file.name().to_owned(),
            mime_type: file.mime_type().to_owned(),
        });
    }

    Ok(())
}

/// Validate `files` as a batch and append them to `existing`.
///
/// Returns a new gallery; `existing` is never modified.
///
/// # Errors
///
/// Returns [`IntakeError::Validation`] for the first file that fails the
/// policy, or [`IntakeError::Read`] if any file cannot be read. The size limit
/// is checked again on the bytes actually read. In every case no file from
/// the batch is added.
pub async fn validate_and_ingest<F: SelectedFile>(
    files: &[F],
    existing: &[ImageReference],
) -> Result<Vec<ImageReference>, IntakeError> {
    for file in files {
        if let Err(err) = validate(file) {
            tracing::info!(file = file.name(), reason = %err, "upload rejected");
            return Err(err.into());
        }
    }

    let encoded = try_join_all(files.iter().map(|file| async move {
        let bytes = file.read().await.map_err(|source| IntakeError::Read {
            name: file.name().to_owned(),
            source,
        })?;
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if size > MAX_IMAGE_BYTES {
            tracing::info!(file = file.name(), size, "upload grew past the size limit");
            return Err(ValidationError::TooLarge {
                name: file.name().to_owned(),
                size,
            }
            .into());
        }
        Ok::<_, IntakeError>(ImageReference::from_bytes(file.mime_type(), &bytes))
    }))
    .await?;

    tracing::debug!(added = encoded.len(), "images ingested");

    let mut gallery = Vec::with_capacity(existing.len() + encoded.len());
    gallery.extend_from_slice(existing);
    gallery.extend(encoded);
    Ok(gallery)
}
