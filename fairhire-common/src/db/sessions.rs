//! Durable session operations

use crate::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// An established session
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: String,
}

/// Create a session for an authenticated user and return its token
pub async fn create(pool: &SqlitePool, username: &str, role: &str) -> Result<String> {
    let token = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO sessions (token, username, role) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(username)
        .bind(role)
        .execute(pool)
        .await?;

    Ok(token)
}

/// Look up a session by token
pub async fn find(pool: &SqlitePool, token: &str) -> Result<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(
        "SELECT token, username, role FROM sessions WHERE token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// Delete a session; deleting an unknown token is a no-op (logout is idempotent)
pub async fn delete(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}
