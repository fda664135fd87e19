//! Handlers for the `/users` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, State};
use axum::Json;
use ripple_core::error::CoreError;
use ripple_core::types::DbId;
use ripple_db::models::user::{UpdateProfile, UserProfile, UserResponse};
use ripple_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/me
///
/// Return the authenticated user's own account.
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;

    Ok(Json(DataResponse { data: user.into() }))
}

/// PATCH /api/v1/users/me
///
/// Update the authenticated user's profile fields. The avatar is a URL/path
/// string; blob storage itself is an external collaborator.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;

    Ok(Json(DataResponse { data: user.into() }))
}

/// GET /api/v1/users
///
/// The contact list: every other user's public profile with live presence.
pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserProfile>>>> {
    let users = UserRepo::list_profiles(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}
///
/// A single user's public profile.
pub async fn get_user(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let profile = UserRepo::find_profile(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    Ok(Json(DataResponse { data: profile }))
}
