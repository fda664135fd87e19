//! Route definitions for the `/users` resource.
//!
//! All endpoints require authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /me     -> me
/// PATCH  /me     -> update_me
/// GET    /       -> list_users
/// GET    /{id}   -> get_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::me).patch(users::update_me))
        .route("/", get(users::list_users))
        .route("/{id}", get(users::get_user))
}
