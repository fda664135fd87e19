//! Repository for the `chat_sessions` table, including the find-or-create
//! session resolver.

use ripple_core::chat::ordered_pair;
use ripple_core::types::DbId;
use sqlx::PgPool;

use crate::models::chat::{ChatSession, ConversationSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user1_id, user2_id, created_at, updated_at";

/// Provides lookup and find-or-create operations for chat sessions.
pub struct ChatSessionRepo;

impl ChatSessionRepo {
    /// Find a session by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ChatSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chat_sessions WHERE id = $1");
        sqlx::query_as::<_, ChatSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the session for an unordered user pair.
    ///
    /// The uniqueness constraint covers only the ordered pair, so both
    /// orderings are checked.
    pub async fn find_by_pair(
        pool: &PgPool,
        user_a: DbId,
        user_b: DbId,
    ) -> Result<Option<ChatSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chat_sessions
             WHERE (user1_id = $1 AND user2_id = $2)
                OR (user1_id = $2 AND user2_id = $1)"
        );
        sqlx::query_as::<_, ChatSession>(&query)
            .bind(user_a)
            .bind(user_b)
            .fetch_optional(pool)
            .await
    }

    /// Return the existing session for the pair, or create one.
    ///
    /// Two concurrent calls for the same pair can race between the existence
    /// check and the insert. The insert relies on the pair uniqueness
    /// constraint: on a 23505 the loser re-queries and returns the winner's
    /// row instead of surfacing the conflict.
    pub async fn find_or_create(
        pool: &PgPool,
        user_a: DbId,
        user_b: DbId,
    ) -> Result<ChatSession, sqlx::Error> {
        if let Some(session) = Self::find_by_pair(pool, user_a, user_b).await? {
            return Ok(session);
        }

        // Insert canonically ordered so the constraint also covers the
        // reversed argument order of a concurrent call.
        let (user1_id, user2_id) = ordered_pair(user_a, user_b);
        let query = format!(
            "INSERT INTO chat_sessions (user1_id, user2_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, ChatSession>(&query)
            .bind(user1_id)
            .bind(user2_id)
            .fetch_one(pool)
            .await;

        match inserted {
            Ok(session) => Ok(session),
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!(
                    user_a,
                    user_b,
                    "Lost chat session creation race, re-querying"
                );
                Self::find_by_pair(pool, user_a, user_b)
                    .await?
                    .ok_or(e)
            }
            Err(e) => Err(e),
        }
    }

    /// List the user's conversations, newest activity first, with the
    /// counterpart's display fields and the caller's unread count.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ConversationSummary>, sqlx::Error> {
        sqlx::query_as::<_, ConversationSummary>(
            "SELECT s.id AS chat_session_id,
                    u.id AS counterpart_id,
                    u.username,
                    u.profile_picture,
                    u.is_online,
                    (SELECT COUNT(*) FROM messages m
                      WHERE m.chat_session_id = s.id
                        AND m.sender_id <> $1
                        AND m.is_read = false) AS unread_count,
                    s.updated_at
             FROM chat_sessions s
             JOIN users u
               ON u.id = CASE WHEN s.user1_id = $1 THEN s.user2_id ELSE s.user1_id END
             WHERE s.user1_id = $1 OR s.user2_id = $1
             ORDER BY s.updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}

/// Whether the error is a PostgreSQL unique constraint violation (23505).
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}
