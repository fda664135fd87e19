//! Wire events for the realtime channel.
//!
//! All events are JSON objects tagged with a `type` field, e.g.
//! `{"type":"send_message","chat_session_id":3,"message_text":"hi"}`.

use axum::extract::ws::Message;
use ripple_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// Events a client may send over the realtime channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Send a message into an existing chat session.
    SendMessage {
        chat_session_id: DbId,
        message_text: String,
    },
}

/// A delivered chat message: the persisted row enriched with the sender's
/// display fields, as pushed to both participants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageDelivery {
    pub id: DbId,
    pub chat_session_id: DbId,
    pub sender_id: DbId,
    pub username: String,
    pub profile_picture: Option<String>,
    pub message_text: String,
    pub created_at: Timestamp,
}

/// Events the server pushes over the realtime channel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A new message in one of the recipient's sessions.
    NewMessage(MessageDelivery),
    /// A user's connection went live.
    UserOnline { user_id: DbId },
    /// A user's last connection closed.
    UserOffline { user_id: DbId },
    /// Acknowledgment that an inbound event was rejected. The connection
    /// stays open.
    Error { code: String, message: String },
}

impl ServerEvent {
    /// Serialize into a WebSocket text frame.
    pub fn to_ws_message(&self) -> Message {
        // Serialization of these variants cannot fail; the expect documents that.
        let json = serde_json::to_string(self).expect("ServerEvent serialization is infallible");
        Message::Text(json.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn client_event_parses_send_message() {
        let json = r#"{"type":"send_message","chat_session_id":3,"message_text":"hi"}"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        let ClientEvent::SendMessage {
            chat_session_id,
            message_text,
        } = event;
        assert_eq!(chat_session_id, 3);
        assert_eq!(message_text, "hi");
    }

    #[test]
    fn client_event_rejects_unknown_type() {
        let json = r#"{"type":"reticulate_splines"}"#;
        assert!(serde_json::from_str::<ClientEvent>(json).is_err());
    }

    #[test]
    fn new_message_serializes_with_inline_fields() {
        let event = ServerEvent::NewMessage(MessageDelivery {
            id: 10,
            chat_session_id: 3,
            sender_id: 1,
            username: "alice".into(),
            profile_picture: None,
            message_text: "hi".into(),
            created_at: Utc::now(),
        });

        let value: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "new_message");
        assert_eq!(value["id"], 10);
        assert_eq!(value["chat_session_id"], 3);
        assert_eq!(value["sender_id"], 1);
        assert_eq!(value["username"], "alice");
        assert_eq!(value["message_text"], "hi");
        assert!(value["created_at"].is_string());
    }

    #[test]
    fn presence_events_serialize_with_type_tags() {
        let online: serde_json::Value =
            serde_json::to_value(ServerEvent::UserOnline { user_id: 5 }).unwrap();
        assert_eq!(online["type"], "user_online");
        assert_eq!(online["user_id"], 5);

        let offline: serde_json::Value =
            serde_json::to_value(ServerEvent::UserOffline { user_id: 5 }).unwrap();
        assert_eq!(offline["type"], "user_offline");
    }
}
