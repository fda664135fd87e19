//! Handlers for the `/posts` resource (feed, likes, comments).
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ripple_core::error::CoreError;
use ripple_core::types::DbId;
use ripple_db::models::post::{CommentEntry, CreateComment, CreatePost, FeedEntry};
use ripple_db::repositories::{CommentRepo, PostRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum page size for the feed.
const MAX_LIMIT: i64 = 100;

/// Default page size for the feed.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum accepted post/comment body length in characters.
const MAX_BODY_LEN: usize = 5000;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /posts`.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Response body for `POST /posts/{id}/like`.
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    /// Whether the caller now likes the post.
    pub liked: bool,
    pub like_count: i64,
}

/// Trim and validate a post or comment body.
fn normalize_body(body: &str) -> Result<String, AppError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Body must not be empty".into()).into());
    }
    if trimmed.chars().count() > MAX_BODY_LEN {
        return Err(
            CoreError::Validation(format!("Body must be at most {MAX_BODY_LEN} characters"))
                .into(),
        );
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/posts
///
/// Create a post and return it as a feed entry.
pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreatePost>,
) -> AppResult<(StatusCode, Json<DataResponse<FeedEntry>>)> {
    input.body = normalize_body(&input.body)?;

    let post = PostRepo::create(&state.pool, auth.user_id, &input).await?;
    let entry = PostRepo::find_feed_entry(&state.pool, auth.user_id, post.id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Post",
            id: post.id,
        })?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/posts
///
/// The feed as seen by the authenticated user, newest first.
pub async fn list_feed(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> AppResult<Json<DataResponse<Vec<FeedEntry>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let feed = PostRepo::list_feed(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: feed }))
}

/// DELETE /api/v1/posts/{id}
///
/// Delete the caller's own post. Returns 404 if the post does not exist,
/// 403 if it belongs to someone else.
pub async fn delete_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        })?;

    if post.author_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author may delete a post".into(),
        )));
    }

    PostRepo::delete_owned(&state.pool, post_id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/posts/{id}/like
///
/// Toggle the caller's like on a post.
pub async fn toggle_like(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<Json<DataResponse<LikeResponse>>> {
    // Liking a nonexistent post should be 404, not an FK error.
    PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        })?;

    let liked = if PostRepo::like(&state.pool, post_id, auth.user_id).await? {
        true
    } else {
        PostRepo::unlike(&state.pool, post_id, auth.user_id).await?;
        false
    };

    let like_count = PostRepo::like_count(&state.pool, post_id).await?;

    Ok(Json(DataResponse {
        data: LikeResponse { liked, like_count },
    }))
}

/// GET /api/v1/posts/{id}/comments
///
/// A post's comments in ascending creation order.
pub async fn list_comments(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CommentEntry>>>> {
    PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        })?;

    let comments = CommentRepo::list_for_post(&state.pool, post_id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/posts/{id}/comments
///
/// Add a comment to a post.
pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<DataResponse<CommentEntry>>)> {
    let body = normalize_body(&input.body)?;

    PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        })?;

    let comment = CommentRepo::create(&state.pool, post_id, auth.user_id, &body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}
