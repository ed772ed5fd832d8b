//! API liveness message.

use axum::{Json, Router, routing::get};

use lingofy_core::{API_RUNNING_MESSAGE, ApiStatus};

use crate::state::AppState;

/// Build the status router.
pub fn router() -> Router<AppState> {
    Router::new().route("/test", get(status))
}

async fn status() -> Json<ApiStatus> {
    Json(ApiStatus {
        message: API_RUNNING_MESSAGE.to_string(),
    })
}
