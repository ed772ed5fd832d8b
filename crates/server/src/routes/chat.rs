//! Assistant chat.

use axum::{Json, Router, extract::State, extract::rejection::JsonRejection, routing::post};
use tracing::instrument;

use lingofy_core::{ChatReply, ChatRequest, ChatRole};

use crate::error::AppError;
use crate::state::AppState;

/// Build the chat router.
pub fn router() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

#[instrument(skip_all)]
async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(request) = payload?;

    match request.messages.last() {
        None => return Err(AppError::BadRequest("messages must not be empty".to_string())),
        Some(last) if last.role != ChatRole::User => {
            return Err(AppError::BadRequest(
                "the last message must come from the user".to_string(),
            ));
        }
        Some(last) if last.content.trim().is_empty() => {
            return Err(AppError::BadRequest("message is empty".to_string()));
        }
        Some(_) => {}
    }

    tracing::debug!(turns = request.messages.len(), "chat request");
    let text = state.ai().chat(&request.messages).await?;
    Ok(Json(ChatReply { text }))
}
