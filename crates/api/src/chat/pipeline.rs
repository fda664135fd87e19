//! The message pipeline: validate, persist, and fan out a chat message.

use std::sync::Arc;

use ripple_core::chat::normalize_message_text;
use ripple_core::error::CoreError;
use ripple_core::types::DbId;
use ripple_db::repositories::{ChatSessionRepo, MessageRepo, UserRepo};
use ripple_db::DbPool;

use crate::chat::events::{MessageDelivery, ServerEvent};
use crate::error::AppResult;
use crate::ws::PresenceRegistry;

/// Persists inbound chat messages and delivers them to both participants.
///
/// Delivery is fire-and-forget: the sender's own connection always gets an
/// echo (multi-tab consistency), the counterpart only if currently
/// registered. An offline recipient picks the message up through the
/// history-fetch path instead.
pub struct MessagePipeline {
    pool: DbPool,
    presence: Arc<PresenceRegistry>,
}

impl MessagePipeline {
    /// Create a new pipeline over the given pool and presence registry.
    pub fn new(pool: DbPool, presence: Arc<PresenceRegistry>) -> Self {
        Self { pool, presence }
    }

    /// Validate, persist, and fan out one message.
    ///
    /// Fails with Validation on empty/overlong text, NotFound on an unknown
    /// session, and Forbidden when the sender is not a participant. Any
    /// persistence failure aborts the whole operation; push failures do not.
    pub async fn send(
        &self,
        sender_id: DbId,
        chat_session_id: DbId,
        message_text: &str,
    ) -> AppResult<MessageDelivery> {
        let text = normalize_message_text(message_text)?;

        let session = ChatSessionRepo::find_by_id(&self.pool, chat_session_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ChatSession",
                id: chat_session_id,
            })?;

        let recipient_id = session.counterpart_of(sender_id).ok_or_else(|| {
            CoreError::Forbidden("Sender is not a participant of this chat session".into())
        })?;

        // Message insert and session recency update share one transaction.
        let message = MessageRepo::create(&self.pool, session.id, sender_id, &text).await?;

        let sender = UserRepo::find_profile(&self.pool, sender_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: sender_id,
            })?;

        let delivery = MessageDelivery {
            id: message.id,
            chat_session_id: message.chat_session_id,
            sender_id: message.sender_id,
            username: sender.username,
            profile_picture: sender.profile_picture,
            message_text: message.message_text,
            created_at: message.created_at,
        };

        let frame = ServerEvent::NewMessage(delivery.clone()).to_ws_message();

        // Echo to the sender first, then the counterpart if online.
        self.presence.send_to_user(sender_id, frame.clone()).await;
        let recipient_online = self.presence.send_to_user(recipient_id, frame).await;

        tracing::debug!(
            message_id = delivery.id,
            chat_session_id,
            sender_id,
            recipient_id,
            recipient_online,
            "Message persisted and fanned out"
        );

        Ok(delivery)
    }
}
