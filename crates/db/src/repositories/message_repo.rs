//! Repository for the `messages` table.

use ripple_core::types::DbId;
use sqlx::PgPool;

use crate::models::chat::Message;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, chat_session_id, sender_id, message_text, is_read, created_at";

/// Provides persistence operations for chat messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a message and touch the session's `updated_at`, in one
    /// transaction so a message is never visible without the session
    /// recency update.
    pub async fn create(
        pool: &PgPool,
        chat_session_id: DbId,
        sender_id: DbId,
        message_text: &str,
    ) -> Result<Message, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO messages (chat_session_id, sender_id, message_text)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(chat_session_id)
            .bind(sender_id)
            .bind(message_text)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE chat_sessions SET updated_at = NOW() WHERE id = $1")
            .bind(chat_session_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    /// List a session's messages in ascending creation order.
    ///
    /// Ties on `created_at` are broken by `id` so the order is total.
    pub async fn list_for_session(
        pool: &PgPool,
        chat_session_id: DbId,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE chat_session_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(chat_session_id)
            .fetch_all(pool)
            .await
    }

    /// Mark as read every message in the session that the reader did not
    /// send. A single bulk update; re-marking already-read rows is a no-op.
    ///
    /// Returns the number of rows that transitioned to read.
    pub async fn mark_read(
        pool: &PgPool,
        chat_session_id: DbId,
        reader_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = true
             WHERE chat_session_id = $1
               AND sender_id <> $2
               AND is_read = false",
        )
        .bind(chat_session_id)
        .bind(reader_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count the session's messages. Used by tests and maintenance tooling.
    pub async fn count_for_session(
        pool: &PgPool,
        chat_session_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE chat_session_id = $1")
                .bind(chat_session_id)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }
}
