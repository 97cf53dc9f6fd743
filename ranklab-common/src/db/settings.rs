//! Settings-table accessors
//!
//! Settings are mutable external configuration. Callers read them at
//! request time rather than caching values across requests, so an admin
//! change takes effect on the next evaluation.

use crate::{Error, Result};
use sqlx::SqlitePool;

/// Read a raw setting value
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    Ok(value.flatten())
}

/// Write a setting value (insert or update)
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Read an integer setting, failing if it is missing or malformed
pub async fn get_int_setting(pool: &SqlitePool, key: &str) -> Result<i64> {
    let raw = get_setting(pool, key)
        .await?
        .ok_or_else(|| Error::Config(format!("Missing setting: {}", key)))?;

    raw.parse::<i64>()
        .map_err(|_| Error::Config(format!("Setting '{}' is not an integer: {}", key, raw)))
}

/// Process-wide default submission quota, read at evaluation time
pub async fn default_submission_quota(pool: &SqlitePool) -> Result<i64> {
    get_int_setting(pool, "default_submission_quota").await
}

/// Default leaderboard result-size limit
pub async fn leaderboard_default_limit(pool: &SqlitePool) -> Result<i64> {
    get_int_setting(pool, "leaderboard_default_limit").await
}
