// ABOUTME: Integration tests for draft storage backends and debounced autosave
// ABOUTME: Tests expiry on read, sweeping, key prefixing, typed snapshots, and autosave timing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests per CLAUDE.md guidelines)
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use virtus_server::{
    builder::{EditorSnapshot, ProgramEditor},
    drafts::{
        load_json, now_millis, save_json, DraftAutosaver, DraftEntry, DraftStore,
        MemoryDraftStore,
    },
};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct NutritionForm {
    name: String,
    calories: u32,
}

fn form(calories: u32) -> NutritionForm {
    NutritionForm {
        name: "Sèche".into(),
        calories,
    }
}

async fn exercise_store(store: &dyn DraftStore) -> Result<()> {
    assert!(store.load("program_new").await?.is_none());

    let saved = store
        .save("program_new", json!({"name": "Force"}), DAY_MS)
        .await?;
    assert_eq!(saved.expires_at - saved.timestamp, DAY_MS);

    let loaded = store.load("program_new").await?.unwrap();
    assert_eq!(loaded, saved);

    // Saving again replaces the value
    store
        .save("program_new", json!({"name": "Force v2"}), DAY_MS)
        .await?;
    let loaded = store.load("program_new").await?.unwrap();
    assert_eq!(loaded.value, json!({"name": "Force v2"}));

    store.clear("program_new").await?;
    assert!(store.load("program_new").await?.is_none());
    // Clearing a missing key is fine
    store.clear("program_new").await?;

    // A draft already past its expiry reads as absent
    store.save("stale", json!(1), -1).await?;
    assert!(store.load("stale").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_memory_store_basic_operations() -> Result<()> {
    let store = MemoryDraftStore::new();
    exercise_store(&store).await?;
    assert!(store.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sqlite_store_basic_operations() -> Result<()> {
    let database = common::create_test_database().await?;
    let store = database.drafts();
    exercise_store(&store).await?;
    assert_eq!(store.count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_memory_store_removes_expired_entry_on_read() -> Result<()> {
    let store = MemoryDraftStore::new();
    let now = now_millis();
    store.insert_entry(
        "expired",
        DraftEntry {
            value: json!({"week": 2}),
            timestamp: now - 2 * DAY_MS,
            expires_at: now - DAY_MS,
        },
    );
    assert_eq!(store.len(), 1);

    assert!(store.load("expired").await?.is_none());
    assert_eq!(store.len(), 0);
    Ok(())
}

#[tokio::test]
async fn test_sqlite_store_removes_expired_entry_on_read() -> Result<()> {
    let database = common::create_test_database().await?;
    let store = database.drafts();

    store.save("expired", json!({"week": 2}), -DAY_MS).await?;
    assert_eq!(store.count().await?, 1);

    assert!(store.load("expired").await?.is_none());
    assert_eq!(store.count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_cleanup_expired_keeps_live_drafts() -> Result<()> {
    let database = common::create_test_database().await?;
    let sqlite = database.drafts();
    let memory = MemoryDraftStore::new();

    for store in [&sqlite as &dyn DraftStore, &memory as &dyn DraftStore] {
        store.save("live", json!("keep"), DAY_MS).await?;
        store.save("old-1", json!("drop"), -1).await?;
        store.save("old-2", json!("drop"), -1).await?;

        assert_eq!(store.cleanup_expired().await?, 2);
        assert_eq!(store.cleanup_expired().await?, 0);
        assert_eq!(store.load("live").await?.unwrap().value, json!("keep"));
    }
    assert_eq!(sqlite.count().await?, 1);
    assert_eq!(memory.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_keys_are_prefixed_once() -> Result<()> {
    let database = common::create_test_database().await?;
    let store = database.drafts();
    store.save("workout_42", json!(true), DAY_MS).await?;

    let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM form_drafts")
        .fetch_all(database.pool())
        .await?;
    assert_eq!(keys, vec!["virtus_form_workout_42".to_owned()]);

    // Already-prefixed keys address the same draft
    assert!(store.load("virtus_form_workout_42").await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_editor_snapshot_round_trip() -> Result<()> {
    let database = common::create_test_database().await?;
    let store = database.drafts();

    let mut editor = ProgramEditor::new("draft-7", "coach-1");
    editor.set_week_count(3);
    editor.select_week(2)?;
    editor.add_exercise(1)?;
    let snapshot = editor.snapshot();

    save_json(&store, "program_draft-7", &snapshot, DAY_MS).await?;
    let restored: EditorSnapshot = load_json(&store, "program_draft-7").await?.unwrap();
    assert_eq!(restored, snapshot);
    Ok(())
}

#[tokio::test]
async fn test_unreadable_draft_is_discarded() -> Result<()> {
    let store = MemoryDraftStore::new();
    store
        .save("nutrition_new", json!({"unexpected": [1, 2, 3]}), DAY_MS)
        .await?;

    let restored: Option<NutritionForm> = load_json(&store, "nutrition_new").await?;
    assert!(restored.is_none());
    assert!(store.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_autosave_waits_for_quiet_period() -> Result<()> {
    let store = Arc::new(MemoryDraftStore::new());
    let autosaver = DraftAutosaver::spawn(
        store.clone(),
        "nutrition_new",
        DAY_MS,
        Duration::from_millis(100),
    );
    assert_eq!(autosaver.key(), "nutrition_new");

    for calories in [1800, 1900, 2000] {
        autosaver.update(&form(calories))?;
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    // Still typing: nothing written yet
    assert!(store.is_empty());

    tokio::time::sleep(Duration::from_millis(400)).await;
    let restored: Option<NutritionForm> = autosaver.restore().await?;
    assert_eq!(restored, Some(form(2000)));

    autosaver.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn test_autosave_flush_and_clear() -> Result<()> {
    let store = Arc::new(MemoryDraftStore::new());
    let autosaver = DraftAutosaver::spawn(
        store.clone(),
        "nutrition_new",
        DAY_MS,
        Duration::from_secs(60),
    );

    autosaver.update(&form(2200))?;
    autosaver.flush().await?;
    let restored: Option<NutritionForm> = autosaver.restore().await?;
    assert_eq!(restored, Some(form(2200)));

    autosaver.clear().await?;
    assert!(store.is_empty());

    // Nothing pending after a clear, so shutdown writes nothing
    autosaver.shutdown().await?;
    assert!(store.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_autosave_shutdown_writes_pending_snapshot() -> Result<()> {
    let database = common::create_test_database().await?;
    let store = Arc::new(database.drafts());
    let autosaver = DraftAutosaver::spawn(
        store.clone(),
        "nutrition_new",
        DAY_MS,
        Duration::from_secs(60),
    );

    autosaver.update(&form(2500))?;
    autosaver.shutdown().await?;

    let restored: Option<NutritionForm> = load_json(&*store, "nutrition_new").await?;
    assert_eq!(restored, Some(form(2500)));
    Ok(())
}
