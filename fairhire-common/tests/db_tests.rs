//! Integration tests for the persistence layer
//!
//! All tests run against a fresh in-memory SQLite database with the full
//! schema applied.

use fairhire_common::db::{self, audit, sessions, users};

#[tokio::test]
async fn fresh_schema_seeds_the_default_admin() {
    let pool = db::init_in_memory().await.expect("init");

    // Seeded admin exists and verifies with the default password
    let admin = users::verify_login(&pool, "admin", users::DEFAULT_ADMIN_PASSWORD)
        .await
        .expect("query");
    assert!(admin.is_some());
    assert_eq!(admin.unwrap().role, "admin");
}

#[tokio::test]
async fn audit_rows_come_back_most_recent_first() {
    let pool = db::init_in_memory().await.expect("init");

    audit::record_login(&pool, "alice", "10.0.0.1").await.expect("insert");
    audit::record_login(&pool, "bob", "10.0.0.2").await.expect("insert");
    audit::record_login(&pool, "carol", "10.0.0.3").await.expect("insert");

    let events = audit::recent_logins(&pool).await.expect("query");
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].username, "carol");
    assert_eq!(events[2].username, "alice");
    assert_eq!(events[0].ip, "10.0.0.3");

    // Timestamps are non-decreasing going backwards through the log
    assert!(events[0].logged_in_at >= events[2].logged_in_at);
}

#[tokio::test]
async fn signup_then_login_round_trips() {
    let pool = db::init_in_memory().await.expect("init");

    let created = users::create_user(&pool, "Dana", "pw123", "user")
        .await
        .expect("create");
    assert!(created);

    // Username lookup is lowercased on both write and read
    let user = users::verify_login(&pool, "dana", "pw123").await.expect("query");
    assert!(user.is_some());
    let user = user.unwrap();
    assert_eq!(user.username, "dana");
    assert_eq!(user.role, "user");

    // Stored value is a salted hash, not the password
    assert_ne!(user.password_hash, "pw123");
    assert!(!user.password_salt.is_empty());

    let wrong = users::verify_login(&pool, "dana", "nope").await.expect("query");
    assert!(wrong.is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let pool = db::init_in_memory().await.expect("init");

    assert!(users::create_user(&pool, "eve", "a", "user").await.expect("create"));
    assert!(!users::create_user(&pool, "eve", "b", "user").await.expect("create"));
    // Case-insensitive: EVE collides with eve
    assert!(!users::create_user(&pool, "EVE", "c", "user").await.expect("create"));
}

#[tokio::test]
async fn legacy_plaintext_row_verifies_via_fallback() {
    let pool = db::init_in_memory().await.expect("init");

    // Simulate a pre-migration row: empty salt, plaintext in the hash column
    sqlx::query(
        "INSERT INTO users (username, password_hash, password_salt, role) \
         VALUES ('legacy', 'oldpassword', '', 'user')",
    )
    .execute(&pool)
    .await
    .expect("insert");

    let ok = users::verify_login(&pool, "legacy", "oldpassword").await.expect("query");
    assert!(ok.is_some());

    let bad = users::verify_login(&pool, "legacy", "newpassword").await.expect("query");
    assert!(bad.is_none());
}

#[tokio::test]
async fn session_lifecycle() {
    let pool = db::init_in_memory().await.expect("init");

    let token = sessions::create(&pool, "alice", "admin").await.expect("create");

    let session = sessions::find(&pool, &token).await.expect("find");
    assert!(session.is_some());
    let session = session.unwrap();
    assert_eq!(session.username, "alice");
    assert_eq!(session.role, "admin");

    sessions::delete(&pool, &token).await.expect("delete");
    assert!(sessions::find(&pool, &token).await.expect("find").is_none());

    // Logout is idempotent
    sessions::delete(&pool, &token).await.expect("delete again");
}

#[tokio::test]
async fn unknown_session_token_is_none() {
    let pool = db::init_in_memory().await.expect("init");
    let missing = sessions::find(&pool, "not-a-token").await.expect("find");
    assert!(missing.is_none());
}
