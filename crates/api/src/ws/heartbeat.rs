use std::sync::Arc;
use std::time::Duration;

use crate::ws::presence::PresenceRegistry;

/// Interval between heartbeat pings (in seconds).
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawn a background task that sends periodic Ping frames to all registered
/// WebSocket connections.
///
/// The returned `JoinHandle` can be used to abort the task during shutdown.
pub fn start_heartbeat(presence: Arc<PresenceRegistry>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let count = presence.connection_count().await;
            tracing::debug!(count, "WebSocket heartbeat ping");
            presence.ping_all().await;
        }
    })
}
