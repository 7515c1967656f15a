//! Login audit operations
//!
//! One row per successful login. Inserts are best-effort at the call site:
//! a failed audit insert must not fail the login that triggered it, so the
//! caller logs and continues rather than propagating.

use crate::Result;
use serde::Serialize;
use sqlx::SqlitePool;

/// One row of the login audit log
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LoginEvent {
    pub id: i64,
    pub username: String,
    pub logged_in_at: String,
    pub ip: String,
}

/// Append one audit row for a successful login
pub async fn record_login(pool: &SqlitePool, username: &str, ip: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO login_events (username, logged_in_at, ip) VALUES (?, ?, ?)")
        .bind(username)
        .bind(&now)
        .bind(ip)
        .execute(pool)
        .await?;

    Ok(())
}

/// Fetch the full audit log, most recent first
pub async fn recent_logins(pool: &SqlitePool) -> Result<Vec<LoginEvent>> {
    let events = sqlx::query_as::<_, LoginEvent>(
        r#"
        SELECT id, username, logged_in_at, ip
        FROM login_events
        ORDER BY logged_in_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(events)
}
