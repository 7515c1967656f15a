//! Database initialization and persistence operations
//!
//! SQLite via sqlx. Schema creation is idempotent; every table uses
//! `CREATE TABLE IF NOT EXISTS` so startup against an existing database is
//! a no-op. Three tables: append-only login audit, user credentials, and
//! durable sessions.

use crate::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

pub mod audit;
pub mod sessions;
pub mod users;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_and_migrate(&pool).await?;

    Ok(pool)
}

/// Open an in-memory database with the full schema (test helper)
pub async fn init_in_memory() -> Result<SqlitePool> {
    // Single connection: each new in-memory connection is a fresh database,
    // so the pool must never recycle its one connection
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    configure_and_migrate(&pool).await?;

    Ok(pool)
}

async fn configure_and_migrate(pool: &SqlitePool) -> Result<()> {
    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    create_login_events_table(pool).await?;
    create_users_table(pool).await?;
    create_sessions_table(pool).await?;

    Ok(())
}

/// Create the login audit table
///
/// Append-only: rows are inserted on successful login and never updated or
/// deleted by this system.
async fn create_login_events_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS login_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            logged_in_at TEXT NOT NULL,
            ip TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_login_events_time ON login_events(logged_in_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the user credential table and seed the default admin
async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY,
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('admin', 'user')),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Seed the default administrator on first init
    let salt = crate::auth::generate_salt();
    let hash = crate::auth::hash_password(users::DEFAULT_ADMIN_PASSWORD, &salt);
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO users (username, password_hash, password_salt, role)
        VALUES ('admin', ?, ?, 'admin')
        "#,
    )
    .bind(&hash)
    .bind(&salt)
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the sessions table
///
/// Sessions are database-backed so they survive process restarts; every
/// authenticated request performs a lookup here (no in-process cache).
async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            role TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
