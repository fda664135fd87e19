//! Integration tests for the user repository: uniqueness, presence
//! bookkeeping, and profile listing.

use ripple_db::models::user::{CreateUser, UpdateProfile};
use ripple_db::repositories::UserRepo;
use sqlx::PgPool;

fn new_user(name: &str) -> CreateUser {
    CreateUser {
        username: name.to_string(),
        email: format!("{name}@example.com"),
        password_hash: "$argon2id$test-hash".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Test: duplicate username is rejected by the unique constraint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("alice")).await.unwrap();

    let dup = CreateUser {
        email: "other@example.com".to_string(),
        ..new_user("alice")
    };
    let err = UserRepo::create(&pool, &dup).await.unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_users_username"));
        }
        other => panic!("Expected database error, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: login lookup accepts username or email
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_username_or_email_matches_both(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("alice")).await.unwrap();

    let by_name = UserRepo::find_by_username_or_email(&pool, "alice")
        .await
        .unwrap()
        .expect("lookup by username");
    let by_email = UserRepo::find_by_username_or_email(&pool, "alice@example.com")
        .await
        .unwrap()
        .expect("lookup by email");

    assert_eq!(by_name.id, created.id);
    assert_eq!(by_email.id, created.id);

    assert!(UserRepo::find_by_username_or_email(&pool, "nobody")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: online/offline transitions stamp last_seen
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn offline_transition_stamps_last_seen(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("alice")).await.unwrap();
    assert!(!user.is_online);
    assert!(user.last_seen.is_none());

    UserRepo::set_online(&pool, user.id).await.unwrap();
    let online = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(online.is_online);

    UserRepo::set_offline(&pool, user.id).await.unwrap();
    let offline = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(!offline.is_online);
    assert!(
        offline.last_seen.is_some(),
        "going offline must stamp last_seen"
    );
}

// ---------------------------------------------------------------------------
// Test: the contact list excludes the caller and exposes presence
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn contact_list_excludes_caller(pool: PgPool) {
    let alice = UserRepo::create(&pool, &new_user("alice")).await.unwrap();
    let bob = UserRepo::create(&pool, &new_user("bob")).await.unwrap();
    UserRepo::create(&pool, &new_user("carol")).await.unwrap();

    UserRepo::set_online(&pool, bob.id).await.unwrap();

    let contacts = UserRepo::list_profiles(&pool, alice.id).await.unwrap();
    let names: Vec<_> = contacts.iter().map(|p| p.username.as_str()).collect();
    assert_eq!(names, ["bob", "carol"]);

    let bob_profile = contacts.iter().find(|p| p.id == bob.id).unwrap();
    assert!(bob_profile.is_online);
}

// ---------------------------------------------------------------------------
// Test: profile update only touches provided fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_update_is_partial(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("alice")).await.unwrap();

    let updated = UserRepo::update_profile(
        &pool,
        user.id,
        &UpdateProfile {
            profile_picture: Some("/avatars/alice.png".to_string()),
        },
    )
    .await
    .unwrap()
    .expect("user exists");
    assert_eq!(updated.profile_picture.as_deref(), Some("/avatars/alice.png"));

    // A no-op patch leaves the existing value in place.
    let unchanged = UserRepo::update_profile(
        &pool,
        user.id,
        &UpdateProfile {
            profile_picture: None,
        },
    )
    .await
    .unwrap()
    .expect("user exists");
    assert_eq!(
        unchanged.profile_picture.as_deref(),
        Some("/avatars/alice.png")
    );
}
