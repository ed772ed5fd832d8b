//! Save failures reported by the persistence collaborator.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use mockito::Server;
use url::Url;

use lingofy_core::FieldKind;
use lingofy_studio::{HttpBackend, MemoryFile, SaveStatus, StudioConfig, StudioSession};

async fn session_against(server: &Server) -> StudioSession {
    let config = StudioConfig::new(Url::parse(&server.url()).unwrap());
    let mut session = StudioSession::new(Arc::new(HttpBackend::new(&config).unwrap()));
    session.apply_edit("meta.siteName", "Clay Corner", FieldKind::Text);
    session
        .ingest(&[MemoryFile::new("a.webp", "image/webp", b"img".to_vec())])
        .await
        .unwrap();
    session
}

#[tokio::test]
async fn test_server_error_message_is_shown_and_state_kept() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v1/save")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"db down"}"#)
        .create_async()
        .await;

    let mut session = session_against(&server).await;
    let before = session.snapshot();

    let err = session.save().await.unwrap_err();

    assert_eq!(err.message(), "db down");
    assert_eq!(session.save_status(), &SaveStatus::Failed("db down".to_owned()));
    assert_eq!(session.snapshot(), before);
}

#[tokio::test]
async fn test_error_without_body_uses_generic_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v1/save")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let mut session = session_against(&server).await;
    let err = session.save().await.unwrap_err();

    assert_eq!(err.message(), "An error occurred while saving. Please try again.");
}

#[tokio::test]
async fn test_retry_after_failure_succeeds() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("POST", "/api/v1/save")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"db down"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut session = session_against(&server).await;
    session.save().await.unwrap_err();
    failing.remove_async().await;

    let _ok = server
        .mock("POST", "/api/v1/save")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"message":"Data saved successfully!"}"#)
        .create_async()
        .await;

    let confirmation = session.save().await.unwrap();
    assert_eq!(confirmation.message, "Data saved successfully!");
}
