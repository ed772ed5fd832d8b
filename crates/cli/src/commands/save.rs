//! `lingofy save` - edit a profile, attach images and submit it.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use lingofy_core::ImageReference;
use lingofy_studio::{DiskFile, SelectedFile, StudioBackend, StudioSession};

use super::{Assignment, CliError, load_profile, write_profile};

/// Inputs for a single save run.
#[derive(Debug, Default)]
pub struct SaveOptions {
    /// Profile to start from; the default profile when `None`.
    pub profile: Option<PathBuf>,
    /// Raw `section.field=value` edits, applied in order.
    pub assignments: Vec<String>,
    /// Image files to add to the gallery.
    pub images: Vec<PathBuf>,
    /// Generate an AI product photo before saving.
    pub generate: bool,
    /// Extra instructions for the generated photo.
    pub prompt: Option<String>,
    /// Where to write the edited profile.
    pub out: Option<PathBuf>,
}

/// Apply the edits and images, then save the profile.
///
/// # Errors
///
/// Returns an error if an edit or image is invalid, generation fails, or the
/// server does not accept the save.
pub async fn run(
    backend: Arc<dyn StudioBackend>,
    options: SaveOptions,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let assignments = options
        .assignments
        .iter()
        .map(|raw| Assignment::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let profile = load_profile(options.profile.as_deref()).await?;
    let mut session = StudioSession::with_profile(backend, profile);

    for assignment in &assignments {
        session.apply_edit(&assignment.path.to_string(), &assignment.value, assignment.kind());
    }

    if !options.images.is_empty() {
        let mut files = Vec::with_capacity(options.images.len());
        for path in &options.images {
            let file = DiskFile::open(path).await.map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(
                path = %file.path().display(),
                mime_type = file.mime_type(),
                size = file.size(),
                "image selected"
            );
            files.push(file);
        }
        let added = session.ingest(&files).await?;
        tracing::info!(added, gallery = session.gallery().len(), "images attached");
    }

    if options.generate {
        if let Some(prompt) = &options.prompt {
            session.set_extra_prompt(prompt.as_str());
        }
        let index = session.generate_image().await?;
        tracing::info!(index, "generated image attached");
    }

    let gallery_bytes: usize = session
        .gallery()
        .iter()
        .map(ImageReference::decoded_len)
        .sum();
    tracing::info!(
        images = session.gallery().len(),
        bytes = gallery_bytes,
        "saving profile"
    );

    // Written before submitting so a failed save can be retried from the file
    if let Some(path) = &options.out {
        write_profile(path, &session.snapshot()).await?;
    }

    let confirmation = session.save().await?;
    writeln!(out, "{}", confirmation.message).map_err(CliError::Output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lingofy_core::StoreProfile;
    use lingofy_studio::{HttpBackend, StudioConfig};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use url::Url;

    use super::*;

    fn backend_for(server: &Server) -> Arc<dyn StudioBackend> {
        let config = StudioConfig::new(Url::parse(&server.url()).unwrap());
        Arc::new(HttpBackend::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_save_with_edits_and_image() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("mug.png");
        std::fs::write(&image, b"hello").unwrap();
        let snapshot = dir.path().join("edited.json");

        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/save")
            .match_body(Matcher::PartialJson(json!({
                "product": {
                    "title": "Stoneware Mug",
                    "price": 19.5,
                    "images": ["data:image/png;base64,aGVsbG8="]
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"message":"Data saved successfully!"}"#)
            .create_async()
            .await;

        let options = SaveOptions {
            assignments: vec![
                "product.title=Stoneware Mug".to_owned(),
                "product.price=19.5".to_owned(),
            ],
            images: vec![image],
            out: Some(snapshot.clone()),
            ..SaveOptions::default()
        };
        let mut out = Vec::new();
        run(backend_for(&server), options, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Data saved successfully!\n");
        mock.assert_async().await;

        let written: StoreProfile =
            serde_json::from_str(&std::fs::read_to_string(&snapshot).unwrap()).unwrap();
        assert_eq!(written.product.title, "Stoneware Mug");
        assert_eq!(written.product.images.len(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_uses_server_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/save")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"db down"}"#)
            .create_async()
            .await;

        let err = run(backend_for(&server), SaveOptions::default(), &mut Vec::new())
            .await
            .unwrap_err();

        match err {
            CliError::Save(err) => assert_eq!(err.message(), "db down"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_assignment_stops_before_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/save")
            .expect(0)
            .create_async()
            .await;

        let options = SaveOptions {
            assignments: vec!["product.colour=red".to_owned()],
            ..SaveOptions::default()
        };
        let err = run(backend_for(&server), options, &mut Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::FieldPath(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unsupported_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"not an image").unwrap();

        let server = Server::new_async().await;
        let options = SaveOptions {
            images: vec![notes],
            ..SaveOptions::default()
        };
        let err = run(backend_for(&server), options, &mut Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Intake(_)));
    }
}
