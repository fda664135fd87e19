use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use ripple_core::types::DbId;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Opaque identifier for a single registration, handed out by
/// [`PresenceRegistry::register`] and required by
/// [`PresenceRegistry::unregister`].
pub type ConnId = Uuid;

/// A live connection entry for one user.
struct PresenceEntry {
    /// Identifies which registration owns this entry.
    conn_id: ConnId,
    /// Channel sender for outbound messages to this connection.
    sender: WsSender,
}

/// Process-wide registry of live realtime connections, keyed by user.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// owned by the realtime gateway. One entry per user: a new registration for
/// the same user replaces the previous one (last connection wins).
///
/// Single-process only. Entries are lost on restart, and a multi-process
/// deployment would need an externally shared registry instead.
pub struct PresenceRegistry {
    connections: RwLock<HashMap<DbId, PresenceEntry>>,
}

impl PresenceRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register the user's live connection, replacing any prior entry.
    ///
    /// Returns the registration's connection id and the receiver half of the
    /// message channel so the caller can forward messages to the WebSocket
    /// sink.
    pub async fn register(&self, user_id: DbId) -> (ConnId, mpsc::UnboundedReceiver<Message>) {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        let entry = PresenceEntry {
            conn_id,
            sender: tx,
        };
        if self
            .connections
            .write()
            .await
            .insert(user_id, entry)
            .is_some()
        {
            tracing::debug!(user_id, "Replaced existing presence entry");
        }
        (conn_id, rx)
    }

    /// Remove the user's entry, but only if it still belongs to the given
    /// registration. A stale disconnect (the user already reconnected and
    /// the entry was replaced) is a no-op.
    ///
    /// Returns `true` if an entry was removed.
    pub async fn unregister(&self, user_id: DbId, conn_id: ConnId) -> bool {
        let mut conns = self.connections.write().await;
        match conns.get(&user_id) {
            Some(entry) if entry.conn_id == conn_id => {
                conns.remove(&user_id);
                true
            }
            _ => false,
        }
    }

    /// Look up the user's live connection sender, if any.
    pub async fn lookup(&self, user_id: DbId) -> Option<WsSender> {
        self.connections
            .read()
            .await
            .get(&user_id)
            .map(|entry| entry.sender.clone())
    }

    /// Whether the user currently has a live connection.
    pub async fn is_online(&self, user_id: DbId) -> bool {
        self.connections.read().await.contains_key(&user_id)
    }

    /// Push a message to the user's connection if one is registered.
    ///
    /// Fire-and-forget: a closed channel is silently skipped (the connection
    /// is cleaned up by its own receive loop). Returns `true` if a live
    /// entry existed.
    pub async fn send_to_user(&self, user_id: DbId, message: Message) -> bool {
        let conns = self.connections.read().await;
        match conns.get(&user_id) {
            Some(entry) => {
                let _ = entry.sender.send(message);
                true
            }
            None => false,
        }
    }

    /// Broadcast a message to all registered connections.
    ///
    /// Connections whose send channels are closed are silently skipped.
    pub async fn broadcast(&self, message: Message) {
        let conns = self.connections.read().await;
        for entry in conns.values() {
            let _ = entry.sender.send(message.clone());
        }
    }

    /// Broadcast a message to every registered connection except one user's.
    /// Used for presence announcements, which the subject does not need.
    pub async fn broadcast_except(&self, user_id: DbId, message: Message) {
        let conns = self.connections.read().await;
        for (id, entry) in conns.iter() {
            if *id != user_id {
                let _ = entry.sender.send(message.clone());
            }
        }
    }

    /// Return the current number of registered connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Ping frame to every registered connection.
    ///
    /// Used by the heartbeat task to keep connections alive and detect
    /// stale ones.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for entry in conns.values() {
            let _ = entry.sender.send(Message::Ping(Bytes::new()));
        }
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for entry in conns.values() {
            let _ = entry.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
