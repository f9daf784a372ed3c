// ABOUTME: Route handlers for client-owned program copies
// ABOUTME: Reads a copy back as a workout program and marks client sessions completed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::AppState;
use crate::{context::ActorContext, database::ClientProgram, errors::AppError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response for completing a session
#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteSessionResponse {
    /// Completed session id
    pub session_id: String,
    /// Owning client program
    pub client_program_id: String,
    /// Completed sessions in the session's week after the update
    pub completed_in_week: u32,
}

/// Client program routes handler
pub struct ClientProgramRoutes;

impl ClientProgramRoutes {
    /// Create all client program routes
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/client-programs/:id", get(Self::handle_get))
            .route(
                "/api/client-sessions/:id/complete",
                post(Self::handle_complete_session),
            )
            .with_state(state)
    }

    fn ensure_coach(program: &ClientProgram, actor: &ActorContext) -> Result<(), AppError> {
        if program.coach_id == actor.coach_id {
            Ok(())
        } else {
            Err(AppError::not_found(format!("Client program {}", program.id)))
        }
    }

    /// Handle GET /api/client-programs/:id - Read a client copy
    async fn handle_get(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let manager = state.database.client_programs();
        let record = manager
            .get(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client program {id}")))?;
        Self::ensure_coach(&record, &actor)?;

        let program = manager
            .get_program(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client program {id}")))?;

        Ok((StatusCode::OK, Json(program)).into_response())
    }

    /// Handle POST /api/client-sessions/:id/complete - Mark a session done
    async fn handle_complete_session(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(session_id): Path<String>,
    ) -> Result<Response, AppError> {
        let manager = state.database.client_programs();
        let program = manager
            .program_for_session(&session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client session {session_id}")))?;
        Self::ensure_coach(&program, &actor)?;

        manager.mark_session_completed(&session_id).await?;

        let week = manager
            .list_sessions(&program.id)
            .await?
            .into_iter()
            .find(|session| session.id == session_id)
            .map(|session| session.week_number)
            .ok_or_else(|| AppError::not_found(format!("Client session {session_id}")))?;
        let completed_in_week = manager
            .completed_sessions_in_week(&program.id, week)
            .await?;

        let response = CompleteSessionResponse {
            session_id,
            client_program_id: program.id,
            completed_in_week,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
