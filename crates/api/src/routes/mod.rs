pub mod auth;
pub mod chat;
pub mod health;
pub mod posts;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                 WebSocket (token via ?token=)
///
/// /auth/signup                        signup (public)
/// /auth/login                         login (public)
/// /auth/refresh                       refresh (public)
/// /auth/logout                        logout (requires auth)
///
/// /users/me                           get, patch own account
/// /users                              contact list with presence
/// /users/{id}                         public profile
///
/// /posts                              feed (get), create (post)
/// /posts/{id}                         delete (author only)
/// /posts/{id}/like                    toggle like (post)
/// /posts/{id}/comments                list, create
///
/// /chat/sessions                      list conversations, start chat
/// /chat/sessions/{id}/messages        history fetch (marks read)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/posts", posts::router())
        .nest("/chat", chat::router())
}
