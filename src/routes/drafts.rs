// ABOUTME: Route handlers for per-coach form drafts and server-side program editing
// ABOUTME: Raw draft get/put/delete plus applying editor commands to a stored editor snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Draft routes
//!
//! Draft keys are scoped by the acting coach, so two coaches using the same
//! form key never see each other's drafts.

use super::AppState;
use crate::{
    context::ActorContext,
    drafts::{load_json, save_json, storage_key},
    errors::AppError,
    logging::AppLogger,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;
use virtus_builder::{EditCommand, EditorSnapshot, ProgramEditor};

/// Request body for saving a raw draft
#[derive(Debug, Deserialize)]
pub struct SaveDraftBody {
    /// Form state to keep
    pub value: Value,
}

/// Request body for applying editor commands
#[derive(Debug, Deserialize)]
pub struct ApplyCommandsBody {
    /// Template to start from when no draft exists yet
    #[serde(default)]
    pub program_id: Option<String>,
    /// Commands applied in order
    pub commands: Vec<EditCommand>,
}

/// Draft routes handler
pub struct DraftRoutes;

impl DraftRoutes {
    /// Create all draft routes
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(
                "/api/drafts/:key",
                get(Self::handle_get)
                    .put(Self::handle_save)
                    .delete(Self::handle_clear),
            )
            .route("/api/drafts/:key/commands", post(Self::handle_commands))
            .with_state(state)
    }

    /// Draft key as stored for this coach
    ///
    /// The coach id is length-prefixed so no coach id and key pair can spell
    /// another coach's stored key.
    fn coach_key(actor: &ActorContext, key: &str) -> Result<String, AppError> {
        if key.trim().is_empty() {
            return Err(AppError::invalid_input("Draft key cannot be empty"));
        }
        let coach_id = &actor.coach_id;
        Ok(format!("{}:{coach_id}/{key}", coach_id.len()))
    }

    /// Handle GET /api/drafts/:key - Read a draft
    async fn handle_get(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(key): Path<String>,
    ) -> Result<Response, AppError> {
        let draft_key = Self::coach_key(&actor, &key)?;
        let entry = state
            .drafts
            .load(&draft_key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Draft {key}")))?;

        Ok((StatusCode::OK, Json(entry)).into_response())
    }

    /// Handle PUT /api/drafts/:key - Save a draft
    async fn handle_save(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(key): Path<String>,
        Json(body): Json<SaveDraftBody>,
    ) -> Result<Response, AppError> {
        let draft_key = Self::coach_key(&actor, &key)?;
        let entry = state
            .drafts
            .save(&draft_key, body.value, state.config.drafts.ttl_ms())
            .await?;
        AppLogger::log_draft_event(&storage_key(&draft_key), "saved");

        Ok((StatusCode::OK, Json(entry)).into_response())
    }

    /// Handle DELETE /api/drafts/:key - Discard a draft
    async fn handle_clear(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(key): Path<String>,
    ) -> Result<Response, AppError> {
        let draft_key = Self::coach_key(&actor, &key)?;
        state.drafts.clear(&draft_key).await?;
        AppLogger::log_draft_event(&storage_key(&draft_key), "cleared");

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    /// Handle POST /api/drafts/:key/commands - Edit the drafted program
    ///
    /// Starts from the stored snapshot, else from the given template, else from
    /// a fresh program. Nothing is saved if any command fails.
    async fn handle_commands(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(key): Path<String>,
        Json(body): Json<ApplyCommandsBody>,
    ) -> Result<Response, AppError> {
        let draft_key = Self::coach_key(&actor, &key)?;
        let store = state.drafts.as_ref();

        let mut editor = match load_json::<EditorSnapshot>(store, &draft_key).await? {
            Some(snapshot) => ProgramEditor::from_snapshot(snapshot),
            None => match body.program_id.as_deref() {
                Some(program_id) => {
                    let program = state
                        .database
                        .programs()
                        .load(program_id, &actor.coach_id)
                        .await?
                        .ok_or_else(|| AppError::not_found(format!("Program {program_id}")))?;
                    ProgramEditor::from_program(program)
                }
                None => ProgramEditor::new(Uuid::new_v4().to_string(), actor.coach_id.as_str()),
            },
        };

        editor.apply_all(body.commands)?;

        let snapshot = editor.snapshot();
        save_json(store, &draft_key, &snapshot, state.config.drafts.ttl_ms()).await?;

        Ok((StatusCode::OK, Json(snapshot)).into_response())
    }
}
