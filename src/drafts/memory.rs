// ABOUTME: In-process draft store backed by a concurrent map
// ABOUTME: Used by tests and single-node deployments without a drafts table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{now_millis, storage_key, DraftEntry, DraftStore};
use crate::errors::AppResult;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// Draft store keeping entries in a sharded `DashMap`
#[derive(Clone, Default)]
pub struct MemoryDraftStore {
    entries: Arc<DashMap<String, DraftEntry>>,
}

impl MemoryDraftStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a pre-built entry as-is
    pub fn insert_entry(&self, key: &str, entry: DraftEntry) {
        self.entries.insert(storage_key(key), entry);
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn save(&self, key: &str, value: Value, ttl_ms: i64) -> AppResult<DraftEntry> {
        let entry = DraftEntry::new(value, now_millis(), ttl_ms);
        self.entries.insert(storage_key(key), entry.clone());
        Ok(entry)
    }

    async fn load(&self, key: &str) -> AppResult<Option<DraftEntry>> {
        let key = storage_key(key);
        // Clone out before removing; holding a ref across remove deadlocks the shard
        let entry = self.entries.get(&key).map(|e| e.value().clone());

        match entry {
            Some(entry) if entry.is_expired(now_millis()) => {
                self.entries.remove(&key);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn clear(&self, key: &str) -> AppResult<()> {
        self.entries.remove(&storage_key(key));
        Ok(())
    }

    async fn cleanup_expired(&self) -> AppResult<usize> {
        let now = now_millis();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!("Cleaned up {} expired drafts", removed);
        }
        Ok(removed)
    }
}
