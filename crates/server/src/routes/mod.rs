//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/v1/test            - Liveness message
//! POST /api/v1/save            - Accept a store profile
//! POST /api/v1/chat            - Assistant reply for a conversation
//! POST /api/v1/generate-image  - Product photo from a prompt
//! ```

pub mod chat;
pub mod images;
pub mod save;
pub mod status;

use axum::Router;

use crate::state::AppState;

/// Create all API routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(status::router())
        .merge(save::router())
        .merge(chat::router())
        .merge(images::router());

    Router::new().nest("/api/v1", api)
}
