//! Chat entity models: sessions and messages.

use ripple_core::chat::counterpart_of;
use ripple_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `chat_sessions` table.
///
/// The pair `(user1_id, user2_id)` is stored canonically ordered on insert,
/// but lookups still check both orderings (pre-existing rows are not assumed
/// canonical).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatSession {
    pub id: DbId,
    pub user1_id: DbId,
    pub user2_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ChatSession {
    /// Whether the given user is one of the two participants.
    pub fn has_participant(&self, user_id: DbId) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// The other participant, or `None` if `user_id` is not in the session.
    pub fn counterpart_of(&self, user_id: DbId) -> Option<DbId> {
        counterpart_of(self.user1_id, self.user2_id, user_id)
    }
}

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub chat_session_id: DbId,
    pub sender_id: DbId,
    pub message_text: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// A conversation summary for the caller's chat list: the session joined
/// with the counterpart's display fields and the caller's unread count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationSummary {
    pub chat_session_id: DbId,
    pub counterpart_id: DbId,
    pub username: String,
    pub profile_picture: Option<String>,
    pub is_online: bool,
    pub unread_count: i64,
    pub updated_at: Timestamp,
}
