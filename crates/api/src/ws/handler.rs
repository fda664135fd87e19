use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use ripple_core::types::DbId;
use ripple_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::jwt::validate_token;
use crate::chat::{ClientEvent, MessagePipeline, ServerEvent};
use crate::state::AppState;

/// Query parameters for the WebSocket upgrade request.
///
/// Browser WebSocket clients cannot set an `Authorization` header, so the
/// access token rides a query parameter instead.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// The identity is resolved from the access token before the upgrade; a
/// connection without a valid identity is accepted and then closed
/// immediately, without ever becoming active.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let identity: Option<DbId> = query
        .token
        .as_deref()
        .and_then(|token| validate_token(token, &state.config.jwt).ok())
        .map(|claims| claims.sub);

    ws.on_upgrade(move |socket| handle_socket(socket, state, identity))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Connection lifecycle:
///   1. No valid identity: close immediately.
///   2. Register with the presence registry, mark the user online, and
///      announce `user_online` to all other connections.
///   3. Spawn a sender task forwarding registry-channel messages to the sink;
///      dispatch each inbound event on its own task so the read loop never
///      blocks on persistence or fan-out.
///   4. On disconnect: guarded unregister, mark offline with `last_seen`,
///      announce `user_offline` to the remaining connections.
async fn handle_socket(mut socket: WebSocket, state: AppState, identity: Option<DbId>) {
    let Some(user_id) = identity else {
        tracing::debug!("WebSocket connection without valid identity, closing");
        let _ = socket.send(Message::Close(None)).await;
        return;
    };

    tracing::info!(user_id, "WebSocket connected");

    // Register and get the receiver for outbound messages.
    let (conn_id, mut rx) = state.presence.register(user_id).await;

    // Presence bookkeeping failures are logged and swallowed; they must not
    // block the registration or the broadcast.
    if let Err(e) = UserRepo::set_online(&state.pool, user_id).await {
        tracing::error!(user_id, error = %e, "Failed to persist online status");
    }
    state
        .presence
        .broadcast_except(user_id, ServerEvent::UserOnline { user_id }.to_ws_message())
        .await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(user_id, "WebSocket sink closed");
                break;
            }
        }
    });

    let pipeline = Arc::new(MessagePipeline::new(
        state.pool.clone(),
        Arc::clone(&state.presence),
    ));

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Text(text)) => {
                dispatch_event(&state, &pipeline, user_id, text.as_str());
            }
            Ok(Message::Pong(_)) => {
                tracing::trace!(user_id, "Pong received");
            }
            Ok(_) => {
                // Binary and Ping frames carry no application events.
            }
            Err(e) => {
                tracing::debug!(user_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up. The unregister is guarded by conn_id: if the user already
    // reconnected and this entry was replaced, nothing is removed and the
    // user stays online.
    send_task.abort();
    if state.presence.unregister(user_id, conn_id).await {
        if let Err(e) = UserRepo::set_offline(&state.pool, user_id).await {
            tracing::error!(user_id, error = %e, "Failed to persist offline status");
        }
        state
            .presence
            .broadcast(ServerEvent::UserOffline { user_id }.to_ws_message())
            .await;
    }
    tracing::info!(user_id, "WebSocket disconnected");
}

/// Parse one inbound frame and dispatch it on its own task.
///
/// A malformed or failing event never terminates the connection: the error
/// is logged and acknowledged to the sender with an `error` event.
fn dispatch_event(state: &AppState, pipeline: &Arc<MessagePipeline>, user_id: DbId, text: &str) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Dropping malformed realtime event");
            let ack = ServerEvent::Error {
                code: "BAD_EVENT".into(),
                message: "Malformed event".into(),
            };
            let presence = Arc::clone(&state.presence);
            tokio::spawn(async move {
                presence.send_to_user(user_id, ack.to_ws_message()).await;
            });
            return;
        }
    };

    let pipeline = Arc::clone(pipeline);
    let presence = Arc::clone(&state.presence);
    tokio::spawn(async move {
        match event {
            ClientEvent::SendMessage {
                chat_session_id,
                message_text,
            } => {
                if let Err(e) = pipeline.send(user_id, chat_session_id, &message_text).await {
                    tracing::warn!(
                        user_id,
                        chat_session_id,
                        error = %e,
                        "Failed to process send_message event"
                    );
                    let ack = ServerEvent::Error {
                        code: e.code().into(),
                        message: e.public_message(),
                    };
                    presence.send_to_user(user_id, ack.to_ws_message()).await;
                }
            }
        }
    });
}
