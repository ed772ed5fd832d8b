//! Profile saves.
//!
//! Nothing is persisted yet: the payload is logged and acknowledged.

use axum::{Json, Router, extract::rejection::JsonRejection, routing::post};
use tracing::instrument;

use lingofy_core::{SAVE_SUCCESS_MESSAGE, SaveResponse, StoreProfile};

use crate::error::AppError;
use crate::state::AppState;

/// Build the save router.
pub fn router() -> Router<AppState> {
    Router::new().route("/save", post(save))
}

#[instrument(skip_all)]
async fn save(
    payload: Result<Json<StoreProfile>, JsonRejection>,
) -> Result<Json<SaveResponse>, AppError> {
    let Json(profile) = payload?;

    let pretty = serde_json::to_string_pretty(&profile)
        .map_err(|e| AppError::Internal(format!("failed to render payload: {e}")))?;
    tracing::info!(
        site_slug = %profile.meta.site_slug,
        images = profile.product.images.len(),
        payload = %pretty,
        "received data to save"
    );

    Ok(Json(SaveResponse {
        success: true,
        message: Some(SAVE_SUCCESS_MESSAGE.to_string()),
    }))
}
