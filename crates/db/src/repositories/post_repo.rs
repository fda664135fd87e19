//! Repository for the `posts` and `post_likes` tables.

use ripple_core::types::DbId;
use sqlx::PgPool;

use crate::models::post::{CreatePost, FeedEntry, Post};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, author_id, body, image_url, created_at";

/// Columns of the [`FeedEntry`] projection, relative to viewer `$1`.
const FEED_COLUMNS: &str = "p.id, p.author_id, u.username, u.profile_picture, p.body, p.image_url, \
     (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS like_count, \
     (SELECT COUNT(*) FROM post_comments c WHERE c.post_id = p.id) AS comment_count, \
     EXISTS(SELECT 1 FROM post_likes l WHERE l.post_id = p.id AND l.user_id = $1) AS liked_by_me, \
     p.created_at";

/// Provides CRUD and like operations for posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post, returning the created row.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (author_id, body, image_url)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(author_id)
            .bind(&input.body)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Find a post by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the feed as seen by `viewer_id`, newest first.
    pub async fn list_feed(
        pool: &PgPool,
        viewer_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {FEED_COLUMNS}
             FROM posts p
             JOIN users u ON u.id = p.author_id
             ORDER BY p.created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, FeedEntry>(&query)
            .bind(viewer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Fetch a single post as a feed entry for `viewer_id`.
    pub async fn find_feed_entry(
        pool: &PgPool,
        viewer_id: DbId,
        post_id: DbId,
    ) -> Result<Option<FeedEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {FEED_COLUMNS}
             FROM posts p
             JOIN users u ON u.id = p.author_id
             WHERE p.id = $2"
        );
        sqlx::query_as::<_, FeedEntry>(&query)
            .bind(viewer_id)
            .bind(post_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a post owned by `author_id`. Returns `true` if a row was
    /// deleted (the author check is part of the statement).
    pub async fn delete_owned(
        pool: &PgPool,
        post_id: DbId,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
            .bind(post_id)
            .bind(author_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add a like. Idempotent via `ON CONFLICT DO NOTHING`; returns `true`
    /// if the like was newly created.
    pub async fn like(pool: &PgPool, post_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO post_likes (post_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT (post_id, user_id) DO NOTHING",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a like. Returns `true` if a row was deleted.
    pub async fn unlike(pool: &PgPool, post_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count likes on a post.
    pub async fn like_count(pool: &PgPool, post_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
                .bind(post_id)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }
}
