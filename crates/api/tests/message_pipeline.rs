//! Integration tests for the message pipeline: persistence, authorization,
//! and fan-out against a real database and an in-process presence registry.

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::ws::Message;
use ripple_api::chat::MessagePipeline;
use ripple_api::error::AppError;
use ripple_api::ws::PresenceRegistry;
use ripple_core::error::CoreError;
use ripple_core::types::DbId;
use ripple_db::models::user::CreateUser;
use ripple_db::repositories::{ChatSessionRepo, MessageRepo, UserRepo};
use sqlx::PgPool;
use tokio::sync::mpsc::UnboundedReceiver;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, name: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "$argon2id$test-hash".to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
    .id
}

/// Decode the next frame on the channel as a JSON value.
fn next_json(rx: &mut UnboundedReceiver<Message>) -> serde_json::Value {
    let msg = rx.try_recv().expect("expected a pushed frame");
    match msg {
        Message::Text(text) => serde_json::from_str(text.as_str()).expect("frame should be JSON"),
        other => panic!("Expected Text frame, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: both participants online receive the same new_message event
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn both_online_receive_matching_new_message(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let session = ChatSessionRepo::find_or_create(&pool, alice, bob)
        .await
        .unwrap();

    let presence = Arc::new(PresenceRegistry::new());
    let (_ca, mut rx_alice) = presence.register(alice).await;
    let (_cb, mut rx_bob) = presence.register(bob).await;

    let pipeline = MessagePipeline::new(pool.clone(), Arc::clone(&presence));
    let delivery = pipeline.send(alice, session.id, "hi").await.unwrap();

    let to_alice = next_json(&mut rx_alice);
    let to_bob = next_json(&mut rx_bob);

    assert_eq!(to_alice["type"], "new_message");
    assert_eq!(to_bob["type"], "new_message");
    assert_eq!(to_alice["id"], to_bob["id"]);
    assert_eq!(to_alice["id"], delivery.id);
    assert_eq!(to_alice["message_text"], "hi");
    assert_eq!(to_bob["message_text"], "hi");
    assert_eq!(to_bob["sender_id"], alice);
    assert_eq!(to_bob["username"], "alice");
}

// ---------------------------------------------------------------------------
// Test: offline recipient -- persisted, no push, visible via history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn offline_recipient_gets_no_push_but_message_persists(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let session = ChatSessionRepo::find_or_create(&pool, alice, bob)
        .await
        .unwrap();

    let presence = Arc::new(PresenceRegistry::new());
    let (_ca, mut rx_alice) = presence.register(alice).await;
    // Bob is not registered.

    let pipeline = MessagePipeline::new(pool.clone(), Arc::clone(&presence));
    pipeline.send(alice, session.id, "you there?").await.unwrap();

    // The sender still gets the echo.
    let echo = next_json(&mut rx_alice);
    assert_eq!(echo["type"], "new_message");

    // The message is persisted and later visible through history.
    let history = MessageRepo::list_for_session(&pool, session.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].message_text, "you there?");
    assert!(!history[0].is_read);
}

// ---------------------------------------------------------------------------
// Test: whitespace-only text is rejected and persists nothing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn whitespace_text_rejected_and_persists_nothing(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let session = ChatSessionRepo::find_or_create(&pool, alice, bob)
        .await
        .unwrap();

    let presence = Arc::new(PresenceRegistry::new());
    let pipeline = MessagePipeline::new(pool.clone(), Arc::clone(&presence));

    let result = pipeline.send(alice, session.id, "   \t\n ").await;
    assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));

    let count = MessageRepo::count_for_session(&pool, session.id).await.unwrap();
    assert_eq!(count, 0, "a rejected message must not be persisted");
}

// ---------------------------------------------------------------------------
// Test: a non-participant sender is rejected with Forbidden
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_participant_sender_is_forbidden(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let mallory = seed_user(&pool, "mallory").await;
    let session = ChatSessionRepo::find_or_create(&pool, alice, bob)
        .await
        .unwrap();

    let presence = Arc::new(PresenceRegistry::new());
    let pipeline = MessagePipeline::new(pool.clone(), Arc::clone(&presence));

    let result = pipeline.send(mallory, session.id, "let me in").await;
    assert_matches!(result, Err(AppError::Core(CoreError::Forbidden(_))));

    let count = MessageRepo::count_for_session(&pool, session.id).await.unwrap();
    assert_eq!(count, 0);
}

// ---------------------------------------------------------------------------
// Test: sending into an unknown session is NotFound
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_session_is_not_found(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;

    let presence = Arc::new(PresenceRegistry::new());
    let pipeline = MessagePipeline::new(pool.clone(), Arc::clone(&presence));

    let result = pipeline.send(alice, 999_999, "hello?").await;
    assert_matches!(result, Err(AppError::Core(CoreError::NotFound { .. })));
}

// ---------------------------------------------------------------------------
// Test: sending touches the session's recency timestamp
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_touches_session_recency(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let session = ChatSessionRepo::find_or_create(&pool, alice, bob)
        .await
        .unwrap();
    let before = session.updated_at;

    let presence = Arc::new(PresenceRegistry::new());
    let pipeline = MessagePipeline::new(pool.clone(), Arc::clone(&presence));
    pipeline.send(alice, session.id, "bump").await.unwrap();

    let after = ChatSessionRepo::find_by_id(&pool, session.id)
        .await
        .unwrap()
        .unwrap()
        .updated_at;
    assert!(
        after >= before,
        "updated_at must move forward with new messages"
    );

    // The trimmed text is what gets persisted.
    let history = MessageRepo::list_for_session(&pool, session.id).await.unwrap();
    assert_eq!(history[0].message_text, "bump");
}
