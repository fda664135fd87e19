//! Repository for the `post_comments` table.

use ripple_core::types::DbId;
use sqlx::PgPool;

use crate::models::post::CommentEntry;

/// Columns of the [`CommentEntry`] projection.
const COLUMNS: &str = "c.id, c.post_id, c.author_id, u.username, u.profile_picture, \
                        c.body, c.created_at";

/// Provides operations for post comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment, returning it joined with author display fields.
    pub async fn create(
        pool: &PgPool,
        post_id: DbId,
        author_id: DbId,
        body: &str,
    ) -> Result<CommentEntry, sqlx::Error> {
        let query = format!(
            "WITH inserted AS (
                 INSERT INTO post_comments (post_id, author_id, body)
                 VALUES ($1, $2, $3)
                 RETURNING id, post_id, author_id, body, created_at
             )
             SELECT {COLUMNS}
             FROM inserted c
             JOIN users u ON u.id = c.author_id"
        );
        sqlx::query_as::<_, CommentEntry>(&query)
            .bind(post_id)
            .bind(author_id)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// List a post's comments in ascending creation order.
    pub async fn list_for_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<CommentEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}
             FROM post_comments c
             JOIN users u ON u.id = c.author_id
             WHERE c.post_id = $1
             ORDER BY c.created_at, c.id"
        );
        sqlx::query_as::<_, CommentEntry>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }
}
