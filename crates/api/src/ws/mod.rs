//! The realtime gateway: WebSocket upgrade handling, the per-user presence
//! registry, and heartbeat monitoring.

mod handler;
mod heartbeat;
pub mod presence;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use presence::{ConnId, PresenceRegistry, WsSender};
