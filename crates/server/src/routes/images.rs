//! Product image generation.

use axum::{Json, Router, extract::State, extract::rejection::JsonRejection, routing::post};
use tracing::instrument;

use lingofy_core::{GenerateImageRequest, GenerateImageResponse};

use crate::error::AppError;
use crate::state::AppState;

/// Build the image router.
pub fn router() -> Router<AppState> {
    Router::new().route("/generate-image", post(generate_image))
}

/// Answers `{ "image": null }` when the model produced no image.
#[instrument(skip_all)]
async fn generate_image(
    State(state): State<AppState>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<Json<GenerateImageResponse>, AppError> {
    let Json(request) = payload?;

    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::BadRequest("prompt is required".to_string()));
    }

    let image = state.ai().generate_image(prompt).await?;
    tracing::info!(generated = image.is_some(), "image generation finished");
    Ok(Json(GenerateImageResponse { image }))
}
