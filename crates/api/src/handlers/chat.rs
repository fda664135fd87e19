//! Handlers for the `/chat` resource: session resolution and history fetch.
//!
//! All endpoints require authentication via [`AuthUser`]. The realtime send
//! path lives in [`crate::chat::pipeline`]; these handlers cover the
//! request/response surface.

use axum::extract::{Path, State};
use axum::Json;
use ripple_core::error::CoreError;
use ripple_core::types::DbId;
use ripple_db::models::chat::{ChatSession, ConversationSummary, Message};
use ripple_db::repositories::{ChatSessionRepo, MessageRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /chat/sessions`.
#[derive(Debug, Deserialize)]
pub struct StartChatRequest {
    pub other_user_id: DbId,
}

/// Response body for `POST /chat/sessions`.
#[derive(Debug, Serialize)]
pub struct StartChatResponse {
    pub chat_session_id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/chat/sessions
///
/// Find or create the session between the caller and another user.
/// Self-chat is rejected, as is an unknown counterpart.
pub async fn start_chat(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<StartChatRequest>,
) -> AppResult<Json<DataResponse<StartChatResponse>>> {
    if input.other_user_id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot start a chat with yourself".into(),
        )));
    }

    UserRepo::find_profile(&state.pool, input.other_user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: input.other_user_id,
        })?;

    let session = ChatSessionRepo::find_or_create(&state.pool, auth.user_id, input.other_user_id)
        .await?;

    Ok(Json(DataResponse {
        data: StartChatResponse {
            chat_session_id: session.id,
        },
    }))
}

/// GET /api/v1/chat/sessions
///
/// The caller's conversations, newest activity first.
pub async fn list_sessions(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ConversationSummary>>>> {
    let sessions = ChatSessionRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/v1/chat/sessions/{id}/messages
///
/// A session's messages in ascending creation order. As a side effect,
/// every message not sent by the caller is marked read (a single idempotent
/// bulk update).
pub async fn get_messages(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(chat_session_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    let session = load_participant_session(&state, chat_session_id, auth.user_id).await?;

    let messages = MessageRepo::list_for_session(&state.pool, session.id).await?;

    let marked = MessageRepo::mark_read(&state.pool, session.id, auth.user_id).await?;
    if marked > 0 {
        tracing::debug!(
            chat_session_id,
            reader_id = auth.user_id,
            marked,
            "Marked messages read"
        );
    }

    // Reflect the read transition in the returned rows without a re-query.
    let messages = messages
        .into_iter()
        .map(|mut m| {
            if m.sender_id != auth.user_id {
                m.is_read = true;
            }
            m
        })
        .collect();

    Ok(Json(DataResponse { data: messages }))
}

/// Load a session and verify the requester is one of its participants.
async fn load_participant_session(
    state: &AppState,
    chat_session_id: DbId,
    user_id: DbId,
) -> AppResult<ChatSession> {
    let session = ChatSessionRepo::find_by_id(&state.pool, chat_session_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ChatSession",
            id: chat_session_id,
        })?;

    if !session.has_participant(user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Requester is not a participant of this chat session".into(),
        )));
    }

    Ok(session)
}
