//! User credential operations
//!
//! Usernames are stored lowercased and are unique. Credentials are consulted
//! on signup and login only; there is no password rotation or lockout.

use crate::auth::{generate_salt, hash_password, verify_password};
use crate::Result;
use sqlx::SqlitePool;

/// Password for the seeded `admin` row; change after first login
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// A stored user credential row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub password_salt: String,
    pub role: String,
}

/// Create a new user with a salted password hash
///
/// Returns `false` when the username is already taken (the caller maps this
/// to a 409). Never stores plaintext.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    role: &str,
) -> Result<bool> {
    let username = username.trim().to_lowercase();
    let salt = generate_salt();
    let hash = hash_password(password, &salt);

    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO users (username, password_hash, password_salt, role)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&username)
    .bind(&hash)
    .bind(&salt)
    .bind(role)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Look up a user by lowercased username and verify the password attempt
///
/// Returns `None` for an unknown username or a failed verification; the two
/// are indistinguishable to callers by design.
pub async fn verify_login(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<UserRecord>> {
    let username = username.trim().to_lowercase();

    let user = sqlx::query_as::<_, UserRecord>(
        "SELECT username, password_hash, password_salt, role FROM users WHERE username = ?",
    )
    .bind(&username)
    .fetch_optional(pool)
    .await?;

    match user {
        Some(record) if verify_password(password, &record.password_hash, &record.password_salt) => {
            Ok(Some(record))
        }
        _ => Ok(None),
    }
}
