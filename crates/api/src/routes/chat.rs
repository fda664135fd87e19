//! Route definitions for the `/chat` resource.
//!
//! All endpoints require authentication. The realtime channel itself is
//! mounted separately at `/ws`.

use axum::routing::get;
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// GET    /sessions                 -> list_sessions
/// POST   /sessions                 -> start_chat
/// GET    /sessions/{id}/messages   -> get_messages (marks read)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions",
            get(chat::list_sessions).post(chat::start_chat),
        )
        .route("/sessions/{id}/messages", get(chat::get_messages))
}
