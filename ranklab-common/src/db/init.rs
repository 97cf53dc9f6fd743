//! Database initialization
//!
//! Creates the database on first run, applies the schema idempotently, and
//! seeds default settings.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::{info, warn};

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    init_schema(&pool).await?;

    Ok(pool)
}

/// Connect to an in-memory database (test support)
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Apply pragmas and create tables (idempotent, safe to call repeatedly)
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL mode allows concurrent readers alongside one writer, which keeps
    // leaderboard reads from blocking on submission inserts
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    // Set busy timeout
    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;

    create_participants_table(pool).await?;
    create_answer_keys_table(pool).await?;
    create_answer_rows_table(pool).await?;
    create_submissions_table(pool).await?;
    create_settings_table(pool).await?;

    init_default_settings(pool).await?;

    Ok(())
}

async fn create_participants_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS participants (
            guid TEXT PRIMARY KEY,
            display_name TEXT NOT NULL UNIQUE,
            quota_override INTEGER,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (quota_override IS NULL OR quota_override >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_answer_keys_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS answer_keys (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 0,
            row_count INTEGER NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (active IN (0, 1)),
            CHECK (row_count > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_answer_keys_active ON answer_keys(active)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_answer_rows_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS answer_rows (
            key_id TEXT NOT NULL REFERENCES answer_keys(guid) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            row_id TEXT NOT NULL,
            label TEXT NOT NULL,
            PRIMARY KEY (key_id, position),
            CHECK (position >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Row ids must be unique within one answer key
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_answer_rows_key_row ON answer_rows(key_id, row_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the submissions table
///
/// One row per completed evaluation. Rows are immutable after insert and
/// removed only by the participant cascade.
async fn create_submissions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            guid TEXT PRIMARY KEY,
            participant_id TEXT NOT NULL REFERENCES participants(guid) ON DELETE CASCADE,
            attempt_number INTEGER NOT NULL,
            submitted_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            rows_in_canonical INTEGER NOT NULL,
            rows_in_submission INTEGER NOT NULL,
            rows_compared INTEGER NOT NULL,
            missing_rows INTEGER NOT NULL,
            extra_rows INTEGER NOT NULL,
            matches INTEGER NOT NULL,
            accuracy REAL NOT NULL,
            precision REAL NOT NULL,
            recall REAL NOT NULL,
            f1 REAL NOT NULL,
            preview TEXT NOT NULL,
            UNIQUE (participant_id, attempt_number),
            CHECK (attempt_number >= 1),
            CHECK (rows_compared > 0),
            CHECK (matches >= 0 AND matches <= rows_compared),
            CHECK (accuracy >= 0.0 AND accuracy <= 1.0),
            CHECK (precision >= 0.0 AND precision <= 1.0),
            CHECK (recall >= 0.0 AND recall <= 1.0),
            CHECK (f1 >= 0.0 AND f1 <= 1.0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_submissions_participant ON submissions(participant_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_submissions_score ON submissions(accuracy, f1)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores application configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize or update default settings
///
/// Ensures all required settings exist with default values and resets
/// NULL values back to defaults.
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    ensure_setting(pool, "default_submission_quota", "5").await?;
    ensure_setting(pool, "leaderboard_default_limit", "50").await?;

    Ok(())
}

/// Ensure a setting exists with the specified default value
///
/// If the setting doesn't exist, it will be created with the default.
/// If the setting exists but has a NULL value, it will be reset to the default.
pub async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM settings WHERE key = ?)")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if !exists {
        // Use INSERT OR IGNORE to handle concurrent initialization races:
        // multiple workers may pass the exists check simultaneously
        sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(default_value)
            .execute(pool)
            .await?;

        info!("Initialized setting '{}' with default value: {}", key, default_value);
        return Ok(());
    }

    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if value.is_none() {
        sqlx::query("UPDATE settings SET value = ? WHERE key = ?")
            .bind(default_value)
            .bind(key)
            .execute(pool)
            .await?;

        warn!("Setting '{}' was NULL, reset to default: {}", key, default_value);
    }

    Ok(())
}
