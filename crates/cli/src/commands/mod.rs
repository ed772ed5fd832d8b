//! Subcommand implementations.
//!
//! Commands write their results to the `out` writer they are given and log
//! progress through `tracing`, so stdout stays machine-readable.

pub mod chat;
pub mod generate;
pub mod profile;
pub mod save;
pub mod status;

use std::path::{Path, PathBuf};

use thiserror::Error;

use lingofy_core::{FieldKind, FieldPath, FieldPathError, ImageReferenceError, StoreProfile};
use lingofy_studio::{BackendError, ConfigError, GenerationError, IntakeError, SaveError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not reach the Lingofy server: {0}")]
    Backend(#[from] BackendError),

    #[error("Save failed: {0}")]
    Save(#[from] SaveError),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error("Image generation failed: {}", .0.message())]
    Generation(#[from] GenerationError),

    #[error("Invalid field: {0}")]
    FieldPath(#[from] FieldPathError),

    #[error("Invalid assignment {0:?}: expected section.field=value")]
    InvalidAssignment(String),

    #[error("Invalid image data: {0}")]
    Image(#[from] ImageReferenceError),

    #[error("Invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output error: {0}")]
    Output(#[source] std::io::Error),
}

/// A parsed `--set section.field=value` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub path: FieldPath,
    pub value: String,
}

impl Assignment {
    /// Parse `section.field=value`. The value may be empty or contain `=`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no `=` or the path is not an editable field.
    pub fn parse(raw: &str) -> Result<Self, CliError> {
        let (path, value) = raw
            .split_once('=')
            .ok_or_else(|| CliError::InvalidAssignment(raw.to_owned()))?;
        Ok(Self {
            path: FieldPath::parse(path.trim())?,
            value: value.to_owned(),
        })
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.path.kind()
    }
}

/// Read a profile from `path`, or the default profile when `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a profile.
pub async fn load_profile(path: Option<&Path>) -> Result<StoreProfile, CliError> {
    let Some(path) = path else {
        return Ok(StoreProfile::default());
    };

    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write `profile` as pretty JSON to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn write_profile(path: &Path, profile: &StoreProfile) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(profile)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lingofy_core::Section;

    use super::*;

    #[test]
    fn test_assignment_parse() {
        let assignment = Assignment::parse("product.price=19.99").unwrap();
        assert_eq!(assignment.path.section(), Section::Product);
        assert_eq!(assignment.path.field(), "price");
        assert_eq!(assignment.value, "19.99");
        assert_eq!(assignment.kind(), FieldKind::Number);

        let assignment = Assignment::parse("seo.description=a=b").unwrap();
        assert_eq!(assignment.value, "a=b");
        assert_eq!(assignment.kind(), FieldKind::Text);
    }

    #[test]
    fn test_assignment_errors() {
        assert!(matches!(
            Assignment::parse("product.price"),
            Err(CliError::InvalidAssignment(_))
        ));
        assert!(matches!(
            Assignment::parse("price=3"),
            Err(CliError::FieldPath(_))
        ));
        assert!(matches!(
            Assignment::parse("product.images=x"),
            Err(CliError::FieldPath(_))
        ));
    }

    #[tokio::test]
    async fn test_profile_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        let mut profile = StoreProfile::default();
        profile.creator.bio = "Potter from Porto.".to_owned();
        write_profile(&path, &profile).await.unwrap();

        assert_eq!(load_profile(Some(&path)).await.unwrap(), profile);
        assert_eq!(load_profile(None).await.unwrap(), StoreProfile::default());
    }

    #[tokio::test]
    async fn test_load_missing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_profile(Some(&dir.path().join("missing.json")))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
