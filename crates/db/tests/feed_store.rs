//! Integration tests for the feed repositories: posts, likes, comments.

use ripple_db::models::post::{CreateComment, CreatePost};
use ripple_db::models::user::CreateUser;
use ripple_db::repositories::{CommentRepo, PostRepo, UserRepo};
use sqlx::PgPool;

async fn seed_user(pool: &PgPool, name: &str) -> i64 {
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

fn new_post(body: &str) -> CreatePost {
    CreatePost {
        body: body.to_string(),
        image_url: None,
    }
}

// ---------------------------------------------------------------------------
// Test: the feed is newest-first with author fields and viewer-relative state
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn feed_is_newest_first_with_counts(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;

    let first = PostRepo::create(&pool, alice, &new_post("first")).await.unwrap();
    let second = PostRepo::create(&pool, bob, &new_post("second")).await.unwrap();

    PostRepo::like(&pool, first.id, bob).await.unwrap();

    let feed = PostRepo::list_feed(&pool, bob, 50, 0).await.unwrap();
    assert_eq!(feed.len(), 2);

    assert_eq!(feed[0].id, second.id, "newest post comes first");
    assert_eq!(feed[1].id, first.id);

    assert_eq!(feed[1].username, "alice");
    assert_eq!(feed[1].like_count, 1);
    assert!(feed[1].liked_by_me, "bob liked alice's post");
    assert!(!feed[0].liked_by_me);
}

// ---------------------------------------------------------------------------
// Test: liking is idempotent, unliking removes exactly one row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn like_is_idempotent(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let post = PostRepo::create(&pool, alice, &new_post("likeable")).await.unwrap();

    assert!(PostRepo::like(&pool, post.id, bob).await.unwrap());
    assert!(
        !PostRepo::like(&pool, post.id, bob).await.unwrap(),
        "second like must be a no-op"
    );
    assert_eq!(PostRepo::like_count(&pool, post.id).await.unwrap(), 1);

    assert!(PostRepo::unlike(&pool, post.id, bob).await.unwrap());
    assert!(!PostRepo::unlike(&pool, post.id, bob).await.unwrap());
    assert_eq!(PostRepo::like_count(&pool, post.id).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: comments list ascending with author fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn comments_list_ascending(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let post = PostRepo::create(&pool, alice, &new_post("discuss")).await.unwrap();

    CommentRepo::create(&pool, post.id, bob, "first!").await.unwrap();
    CommentRepo::create(&pool, post.id, alice, "thanks").await.unwrap();

    let comments = CommentRepo::list_for_post(&pool, post.id).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].body, "first!");
    assert_eq!(comments[0].username, "bob");
    assert_eq!(comments[1].body, "thanks");

    let entry = PostRepo::find_feed_entry(&pool, alice, post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.comment_count, 2);
}

// ---------------------------------------------------------------------------
// Test: only the author's delete removes the post
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_is_scoped_to_author(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let post = PostRepo::create(&pool, alice, &new_post("mine")).await.unwrap();

    assert!(
        !PostRepo::delete_owned(&pool, post.id, bob).await.unwrap(),
        "someone else's delete must not match"
    );
    assert!(PostRepo::find_by_id(&pool, post.id).await.unwrap().is_some());

    assert!(PostRepo::delete_owned(&pool, post.id, alice).await.unwrap());
    assert!(PostRepo::find_by_id(&pool, post.id).await.unwrap().is_none());
}
