//! Lingofy Server library.
//!
//! The HTTP API behind the content studio, exposed as a library so the router
//! can be tested and embedded.
//!
//! # Architecture
//!
//! - Axum router built by [`build_app`]
//! - AI provider injected as an [`AiModel`](ai::AiModel) through [`AppState`]
//! - Google Gemini as the production provider ([`gemini::GeminiClient`])

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ai;
pub mod config;
pub mod error;
pub mod gemini;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

pub use state::AppState;

/// Largest accepted request body. Profiles carry base64 images.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Build the application router.
///
/// Sentry layers are left to the caller so tests don't need a client.
pub fn build_app(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::HeaderName::from_static(
            middleware::REQUEST_ID_HEADER,
        )]);

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        #[allow(clippy::cast_possible_truncation)]
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors)
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use lingofy_core::{ChatMessage, GeneratedImage};

    use super::*;
    use crate::ai::{AiError, AiModel};

    #[derive(Default)]
    struct FakeAi {
        histories: Mutex<Vec<Vec<ChatMessage>>>,
        prompts: Mutex<Vec<String>>,
        image: Option<GeneratedImage>,
        fail_with: Option<fn() -> AiError>,
    }

    #[async_trait]
    impl AiModel for FakeAi {
        async fn chat(&self, history: &[ChatMessage]) -> Result<String, AiError> {
            if let Some(fail) = self.fail_with {
                return Err(fail());
            }
            self.histories.lock().unwrap().push(history.to_vec());
            Ok("Try a clear product title.".to_string())
        }

        async fn generate_image(&self, prompt: &str) -> Result<Option<GeneratedImage>, AiError> {
            if let Some(fail) = self.fail_with {
                return Err(fail());
            }
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.image.clone())
        }
    }

    fn app_with(ai: Arc<FakeAi>) -> Router {
        build_app(
            AppState::new(ai),
            HeaderValue::from_static("http://localhost:5173"),
        )
    }

    fn app() -> Router {
        app_with(Arc::new(FakeAi::default()))
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_status_message() {
        let response = app()
            .oneshot(Request::get("/api/v1/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "message": "🚀 Lingofy API is running!" })
        );
    }

    #[tokio::test]
    async fn test_save_acknowledges_profile() {
        let body = json!({
            "meta": { "siteName": "Clay Corner", "siteSlug": "clay-corner" },
            "product": { "title": "Mug", "price": 12.5, "images": ["data:image/png;base64,aGk="] }
        });

        let response = app().oneshot(post_json("/api/v1/save", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(middleware::REQUEST_ID_HEADER));
        assert_eq!(
            json_body(response).await,
            json!({ "success": true, "message": "Data saved successfully!" })
        );
    }

    #[tokio::test]
    async fn test_save_rejects_malformed_json() {
        let request = Request::post("/api/v1/save")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_body() {
        let huge = "a".repeat(JSON_BODY_LIMIT + 1);
        let body = json!({ "meta": { "siteName": huge } });

        let response = app().oneshot(post_json("/api/v1/save", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_chat_forwards_history() {
        let ai = Arc::new(FakeAi::default());
        let body = json!({ "messages": [
            { "role": "user", "content": "Hi" },
            { "role": "model", "content": "Hello!" },
            { "role": "user", "content": "Pricing tips?" }
        ]});

        let response = app_with(ai.clone())
            .oneshot(post_json("/api/v1/chat", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "text": "Try a clear product title." })
        );
        let histories = ai.histories.lock().unwrap();
        assert_eq!(histories.first().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_chat_requires_user_turn_last() {
        let body = json!({ "messages": [{ "role": "model", "content": "Hello!" }] });
        let response = app().oneshot(post_json("/api/v1/chat", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json!({ "messages": [] });
        let response = app().oneshot(post_json("/api/v1/chat", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "messages must not be empty" })
        );
    }

    #[tokio::test]
    async fn test_chat_provider_failure() {
        let ai = Arc::new(FakeAi {
            fail_with: Some(|| AiError::Unavailable("timeout".to_string())),
            ..FakeAi::default()
        });
        let body = json!({ "messages": [{ "role": "user", "content": "Hi" }] });

        let response = app_with(ai).oneshot(post_json("/api/v1/chat", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "AI provider unavailable: timeout" })
        );
    }

    #[tokio::test]
    async fn test_generate_image_returns_payload() {
        let ai = Arc::new(FakeAi {
            image: Some(GeneratedImage {
                mime_type: "image/png".to_string(),
                data: "aGk=".to_string(),
            }),
            ..FakeAi::default()
        });
        let body = json!({ "prompt": "  a ceramic mug  " });

        let response = app_with(ai.clone())
            .oneshot(post_json("/api/v1/generate-image", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "image": { "mimeType": "image/png", "data": "aGk=" } })
        );
        assert_eq!(ai.prompts.lock().unwrap().as_slice(), ["a ceramic mug"]);
    }

    #[tokio::test]
    async fn test_generate_image_without_image() {
        let body = json!({ "prompt": "a mug" });
        let response = app()
            .oneshot(post_json("/api/v1/generate-image", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "image": null }));
    }

    #[tokio::test]
    async fn test_generate_image_requires_prompt() {
        let body = json!({ "prompt": "   " });
        let response = app()
            .oneshot(post_json("/api/v1/generate-image", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cors_allows_studio_origin() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/v1/save")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:5173"
        );
    }
}
