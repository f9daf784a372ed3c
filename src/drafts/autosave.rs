// ABOUTME: Debounced background autosave of the latest form snapshot
// ABOUTME: A watch channel feeds one task per draft key that writes after a quiet period
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{load_json, storage_key, DraftStore};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Autosaver for one draft key
///
/// Every [`update`](Self::update) replaces the pending snapshot and restarts
/// the quiet period. The snapshot is written once no update arrived for the
/// debounce delay, on [`flush`](Self::flush), or when the autosaver shuts down.
pub struct DraftAutosaver {
    store: Arc<dyn DraftStore>,
    key: String,
    ttl_ms: i64,
    pending: watch::Sender<Option<Value>>,
    task: JoinHandle<()>,
}

impl DraftAutosaver {
    /// Start the background task for `key`
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(
        store: Arc<dyn DraftStore>,
        key: impl Into<String>,
        ttl_ms: i64,
        debounce: Duration,
    ) -> Self {
        let key = key.into();
        let (pending, rx) = watch::channel(None);
        let task = tokio::spawn(debounce_loop(
            Arc::clone(&store),
            key.clone(),
            ttl_ms,
            debounce,
            rx,
        ));

        Self {
            store,
            key,
            ttl_ms,
            pending,
            task,
        }
    }

    /// Draft key this autosaver writes to
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Queue a new snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized
    pub fn update<T: Serialize>(&self, value: &T) -> AppResult<()> {
        let value = serde_json::to_value(value)?;
        self.pending.send_replace(Some(value));
        Ok(())
    }

    /// Write the pending snapshot now
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails
    pub async fn flush(&self) -> AppResult<()> {
        let snapshot = self.pending.borrow().clone();
        if let Some(value) = snapshot {
            self.store.save(&self.key, value, self.ttl_ms).await?;
            AppLogger::log_draft_event(&storage_key(&self.key), "flushed");
        }
        Ok(())
    }

    /// Read back the stored draft
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails
    pub async fn restore<T: DeserializeOwned>(&self) -> AppResult<Option<T>> {
        load_json(self.store.as_ref(), &self.key).await
    }

    /// Drop the pending snapshot and delete the stored draft
    ///
    /// # Errors
    ///
    /// Returns an error if the store delete fails
    pub async fn clear(&self) -> AppResult<()> {
        self.pending.send_replace(None);
        self.store.clear(&self.key).await?;
        AppLogger::log_draft_event(&storage_key(&self.key), "cleared");
        Ok(())
    }

    /// Stop the background task after it writes any pending snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the background task panicked
    pub async fn shutdown(self) -> AppResult<()> {
        let Self { pending, task, .. } = self;
        drop(pending);
        task.await
            .map_err(|e| AppError::internal(format!("Draft autosave task failed: {e}")))
    }
}

async fn debounce_loop(
    store: Arc<dyn DraftStore>,
    key: String,
    ttl_ms: i64,
    debounce: Duration,
    mut rx: watch::Receiver<Option<Value>>,
) {
    while rx.changed().await.is_ok() {
        let mut closed = false;
        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        closed = true;
                        break;
                    }
                }
                () = tokio::time::sleep(debounce) => break,
            }
        }

        let snapshot = rx.borrow_and_update().clone();
        if let Some(value) = snapshot {
            match store.save(&key, value, ttl_ms).await {
                Ok(_) => AppLogger::log_draft_event(&storage_key(&key), "autosaved"),
                Err(e) => warn!(draft.key = %storage_key(&key), "Draft autosave failed: {e}"),
            }
        }

        if closed {
            break;
        }
    }
    debug!(draft.key = %storage_key(&key), "Draft autosave task stopped");
}
