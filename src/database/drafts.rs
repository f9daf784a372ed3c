// ABOUTME: SQLite-backed draft store over the form_drafts table
// ABOUTME: Upserts snapshots by key and drops expired rows on read or sweep
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::drafts::{now_millis, storage_key, DraftEntry, DraftStore};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

/// Draft store persisting entries in `form_drafts`
#[derive(Clone)]
pub struct SqliteDraftStore {
    pool: SqlitePool,
}

impl SqliteDraftStore {
    /// Create a store on an existing pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of stored drafts, expired ones included
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn count(&self) -> AppResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM form_drafts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count drafts: {e}")))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn delete_key(&self, key: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM form_drafts WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete draft: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl DraftStore for SqliteDraftStore {
    async fn save(&self, key: &str, value: Value, ttl_ms: i64) -> AppResult<DraftEntry> {
        let entry = DraftEntry::new(value, now_millis(), ttl_ms);

        sqlx::query(
            r"
            INSERT INTO form_drafts (key, value, timestamp, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                timestamp = excluded.timestamp,
                expires_at = excluded.expires_at
            ",
        )
        .bind(storage_key(key))
        .bind(serde_json::to_string(&entry.value)?)
        .bind(entry.timestamp)
        .bind(entry.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save draft: {e}")))?;

        Ok(entry)
    }

    async fn load(&self, key: &str) -> AppResult<Option<DraftEntry>> {
        let key = storage_key(key);
        let row = sqlx::query("SELECT value, timestamp, expires_at FROM form_drafts WHERE key = $1")
            .bind(&key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load draft: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value_json: String = row.get("value");
        let entry = DraftEntry {
            value: serde_json::from_str(&value_json)?,
            timestamp: row.get("timestamp"),
            expires_at: row.get("expires_at"),
        };

        if entry.is_expired(now_millis()) {
            self.delete_key(&key).await?;
            return Ok(None);
        }

        Ok(Some(entry))
    }

    async fn clear(&self, key: &str) -> AppResult<()> {
        self.delete_key(&storage_key(key)).await
    }

    async fn cleanup_expired(&self) -> AppResult<usize> {
        let result = sqlx::query("DELETE FROM form_drafts WHERE expires_at <= $1")
            .bind(now_millis())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to clean up drafts: {e}")))?;

        let removed = usize::try_from(result.rows_affected()).unwrap_or(usize::MAX);
        if removed > 0 {
            tracing::debug!("Cleaned up {} expired drafts", removed);
        }
        Ok(removed)
    }
}
