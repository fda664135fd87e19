use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ws::PresenceRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ripple_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Presence registry (live realtime connections, keyed by user).
    pub presence: Arc<PresenceRegistry>,
}
