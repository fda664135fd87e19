//! Feed entity models and DTOs: posts, likes, comments.

use ripple_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub author_id: DbId,
    pub body: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
}

/// A feed entry: a post joined with its author's display fields and
/// aggregate like/comment counts, relative to the requesting user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedEntry {
    pub id: DbId,
    pub author_id: DbId,
    pub username: String,
    pub profile_picture: Option<String>,
    pub body: String,
    pub image_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked_by_me: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a new post.
#[derive(Debug, Deserialize)]
pub struct CreatePost {
    pub body: String,
    pub image_url: Option<String>,
}

/// A comment joined with its author's display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentEntry {
    pub id: DbId,
    pub post_id: DbId,
    pub author_id: DbId,
    pub username: String,
    pub profile_picture: Option<String>,
    pub body: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub body: String,
}
