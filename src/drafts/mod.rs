// ABOUTME: Expiring draft persistence for in-progress program edits
// ABOUTME: Store trait, entry shape, key prefixing, and JSON helpers shared by all backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Drafts
//!
//! A draft is a snapshot of an unsaved form, kept under a prefixed key with
//! an absolute expiry. Expired entries are removed the first time they are
//! read and reported as absent.
//!
//! Backends:
//! - [`MemoryDraftStore`]: process-local, for tests and single-node setups
//! - [`crate::database::SqliteDraftStore`]: the `form_drafts` table

/// Debounced background autosave
pub mod autosave;
/// In-process draft store
pub mod memory;

use crate::errors::AppResult;
use crate::logging::AppLogger;
use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use virtus_core::constants::drafts::KEY_PREFIX;

pub use autosave::DraftAutosaver;
pub use memory::MemoryDraftStore;

/// A stored draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEntry {
    /// The saved form state
    pub value: Value,
    /// When the draft was written (epoch millis)
    pub timestamp: i64,
    /// When the draft stops being valid (epoch millis)
    pub expires_at: i64,
}

impl DraftEntry {
    /// Build an entry written at `now` that lives for `ttl_ms`
    #[must_use]
    pub const fn new(value: Value, now: i64, ttl_ms: i64) -> Self {
        Self {
            value,
            timestamp: now,
            expires_at: now.saturating_add(ttl_ms),
        }
    }

    /// Whether the entry is past its expiry at `now`
    #[must_use]
    pub const fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

/// Pluggable draft storage
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Write a draft, replacing any previous value under the same key
    async fn save(&self, key: &str, value: Value, ttl_ms: i64) -> AppResult<DraftEntry>;

    /// Read a draft; expired drafts are deleted and reported as `None`
    async fn load(&self, key: &str) -> AppResult<Option<DraftEntry>>;

    /// Remove a draft (no-op when absent)
    async fn clear(&self, key: &str) -> AppResult<()>;

    /// Remove every expired draft and return how many were dropped
    async fn cleanup_expired(&self) -> AppResult<usize>;
}

/// Storage key for a form key, prefixed once
#[must_use]
pub fn storage_key(key: &str) -> String {
    if key.starts_with(KEY_PREFIX) {
        key.to_owned()
    } else {
        format!("{KEY_PREFIX}{key}")
    }
}

/// Current time in epoch milliseconds
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Serialize and save a typed draft
///
/// # Errors
///
/// Returns an error if serialization or the store write fails
pub async fn save_json<T: Serialize + Sync>(
    store: &dyn DraftStore,
    key: &str,
    value: &T,
    ttl_ms: i64,
) -> AppResult<DraftEntry> {
    let entry = store.save(key, serde_json::to_value(value)?, ttl_ms).await?;
    AppLogger::log_draft_event(&storage_key(key), "saved");
    Ok(entry)
}

/// Load a typed draft
///
/// A draft that no longer matches `T` is discarded and reported as absent,
/// so a stale snapshot never blocks the form from opening.
///
/// # Errors
///
/// Returns an error if the store read fails
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn DraftStore,
    key: &str,
) -> AppResult<Option<T>> {
    let Some(entry) = store.load(key).await? else {
        return Ok(None);
    };

    match serde_json::from_value(entry.value) {
        Ok(value) => {
            AppLogger::log_draft_event(&storage_key(key), "restored");
            Ok(Some(value))
        }
        Err(e) => {
            warn!(draft.key = %storage_key(key), "Discarding unreadable draft: {e}");
            store.clear(key).await?;
            Ok(None)
        }
    }
}
