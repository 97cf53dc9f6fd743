//! Answer-key store
//!
//! Holds the active answer key as an in-memory snapshot behind an Arc.
//! Evaluations clone the Arc and keep working on that snapshot even if the
//! key is replaced mid-flight; replacement swaps the pointer rather than
//! mutating in place.

use std::sync::{Arc, RwLock};

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use ranklab_common::db::AnswerKeyMeta;
use ranklab_common::{Error, Result};

use crate::eval::LabelRecord;

/// The active canonical answer set
#[derive(Debug)]
pub struct AnswerKey {
    pub guid: String,
    pub name: String,
    /// Ground-truth records in their original order; ids are unique
    pub records: Vec<LabelRecord>,
}

/// Shared handle to the active answer-key snapshot
#[derive(Clone)]
pub struct AnswerKeyStore {
    current: Arc<RwLock<Option<Arc<AnswerKey>>>>,
}

impl AnswerKeyStore {
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Current snapshot, if any key is active
    pub fn snapshot(&self) -> Option<Arc<AnswerKey>> {
        self.current.read().unwrap().clone()
    }

    /// Load the active key from the database into the snapshot
    ///
    /// Returns false when no key is active (the service starts
    /// unconfigured and submissions fail with NotConfigured until a key
    /// is uploaded).
    pub async fn load_active(&self, pool: &SqlitePool) -> Result<bool> {
        let meta: Option<(String, String)> =
            sqlx::query_as("SELECT guid, name FROM answer_keys WHERE active = 1")
                .fetch_optional(pool)
                .await?;

        let Some((guid, name)) = meta else {
            return Ok(false);
        };

        let records: Vec<(String, String)> = sqlx::query_as(
            "SELECT row_id, label FROM answer_rows WHERE key_id = ? ORDER BY position",
        )
        .bind(&guid)
        .fetch_all(pool)
        .await?;

        let records = records
            .into_iter()
            .map(|(id, label)| LabelRecord { id, label })
            .collect();

        let key = Arc::new(AnswerKey { guid, name, records });
        info!(key = %key.name, rows = key.records.len(), "Loaded active answer key");
        *self.current.write().unwrap() = Some(key);

        Ok(true)
    }

    /// Replace the active answer key
    ///
    /// Validates the incoming records, persists the new key in one
    /// transaction (deactivating the previous one), and swaps the
    /// in-memory snapshot. Past submissions keep their stored metrics.
    pub async fn replace(
        &self,
        pool: &SqlitePool,
        name: &str,
        records: Vec<LabelRecord>,
    ) -> Result<Arc<AnswerKey>> {
        if records.is_empty() {
            return Err(Error::InvalidInput(
                "Answer key must contain at least one row".to_string(),
            ));
        }

        // Duplicate ids are a data-quality error, rejected at ingestion
        let mut seen = std::collections::HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(Error::InvalidInput(format!(
                    "Duplicate row id in answer key: {}",
                    record.id
                )));
            }
        }

        let guid = Uuid::new_v4().to_string();

        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE answer_keys SET active = 0 WHERE active = 1")
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO answer_keys (guid, name, active, row_count) VALUES (?, ?, 1, ?)")
            .bind(&guid)
            .bind(name)
            .bind(records.len() as i64)
            .execute(&mut *tx)
            .await?;

        for (position, record) in records.iter().enumerate() {
            sqlx::query(
                "INSERT INTO answer_rows (key_id, position, row_id, label) VALUES (?, ?, ?, ?)",
            )
            .bind(&guid)
            .bind(position as i64)
            .bind(&record.id)
            .bind(&record.label)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let key = Arc::new(AnswerKey {
            guid,
            name: name.to_string(),
            records,
        });

        info!(key = %key.name, rows = key.records.len(), "Answer key replaced");

        // Copy-on-replace: in-flight evaluations keep their old Arc
        *self.current.write().unwrap() = Some(key.clone());

        Ok(key)
    }

    /// Metadata of the active key, straight from the database
    pub async fn active_meta(&self, pool: &SqlitePool) -> Result<AnswerKeyMeta> {
        let meta: Option<AnswerKeyMeta> = sqlx::query_as(
            "SELECT guid, name, active, row_count, created_at FROM answer_keys WHERE active = 1",
        )
        .fetch_optional(pool)
        .await?;

        meta.ok_or_else(|| Error::NotFound("No active answer key".to_string()))
    }
}

impl Default for AnswerKeyStore {
    fn default() -> Self {
        Self::new()
    }
}
