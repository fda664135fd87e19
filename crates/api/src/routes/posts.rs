//! Route definitions for the `/posts` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::posts;
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// GET    /                -> list_feed
/// POST   /                -> create_post
/// DELETE /{id}            -> delete_post (author only)
/// POST   /{id}/like       -> toggle_like
/// GET    /{id}/comments   -> list_comments
/// POST   /{id}/comments   -> create_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::list_feed).post(posts::create_post))
        .route("/{id}", axum::routing::delete(posts::delete_post))
        .route("/{id}/like", post(posts::toggle_like))
        .route(
            "/{id}/comments",
            get(posts::list_comments).post(posts::create_comment),
        )
}
