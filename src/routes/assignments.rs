// ABOUTME: Route handlers for program assignments made by a coach
// ABOUTME: Listing, progress summaries, position and status updates, and cascading deletes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Assignment routes

use super::AppState;
use crate::{context::ActorContext, errors::AppError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use virtus_core::models::{AssignmentStatus, ProgramAssignment};

/// Query parameters for listing assignments
#[derive(Debug, Deserialize, Default)]
pub struct ListAssignmentsQuery {
    /// Restrict to one client
    pub client_id: Option<String>,
    /// Only active assignments (requires `client_id`)
    pub active: Option<bool>,
}

/// Response for listing assignments
#[derive(Debug, Serialize, Deserialize)]
pub struct ListAssignmentsResponse {
    /// Matching assignments
    pub assignments: Vec<ProgramAssignment>,
    /// Number of assignments returned
    pub total: usize,
}

/// Request body for moving a client's position
#[derive(Debug, Deserialize)]
pub struct UpdateProgressBody {
    /// Current week (1-based)
    pub current_week: u32,
    /// Current session order within the week (1-based)
    pub current_session_order: u32,
}

/// Request body for changing status
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    /// New status
    pub status: String,
}

/// Assignment routes handler
pub struct AssignmentRoutes;

impl AssignmentRoutes {
    /// Create all assignment routes
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/assignments", get(Self::handle_list))
            .route("/api/assignments/:id", delete(Self::handle_delete))
            .route("/api/assignments/:id/summary", get(Self::handle_summary))
            .route("/api/assignments/:id/progress", put(Self::handle_progress))
            .route("/api/assignments/:id/status", put(Self::handle_status))
            .with_state(state)
    }

    /// Load an assignment made by the acting coach
    async fn owned_assignment(
        state: &AppState,
        actor: &ActorContext,
        id: &str,
    ) -> Result<ProgramAssignment, AppError> {
        state
            .database
            .assignments()
            .get(id)
            .await?
            .filter(|assignment| assignment.coach_id == actor.coach_id)
            .ok_or_else(|| AppError::not_found(format!("Assignment {id}")))
    }

    /// Handle GET /api/assignments - List assignments
    async fn handle_list(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Query(query): Query<ListAssignmentsQuery>,
    ) -> Result<Response, AppError> {
        let manager = state.database.assignments();

        let assignments = match query.client_id.as_deref() {
            Some(client_id) if query.active.unwrap_or(false) => {
                manager.list_active_for_client(client_id).await?
            }
            Some(client_id) => manager.list_for_client(client_id).await?,
            None => manager.list_for_coach(&actor.coach_id).await?,
        };
        let assignments: Vec<ProgramAssignment> = assignments
            .into_iter()
            .filter(|assignment| assignment.coach_id == actor.coach_id)
            .collect();

        let response = ListAssignmentsResponse {
            total: assignments.len(),
            assignments,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/assignments/:id/summary - Progress statistics
    async fn handle_summary(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::owned_assignment(&state, &actor, &id).await?;
        let summary = state
            .database
            .assignments()
            .summary(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Assignment {id}")))?;

        Ok((StatusCode::OK, Json(summary)).into_response())
    }

    /// Handle PUT /api/assignments/:id/progress - Move the client's position
    async fn handle_progress(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(id): Path<String>,
        Json(body): Json<UpdateProgressBody>,
    ) -> Result<Response, AppError> {
        Self::owned_assignment(&state, &actor, &id).await?;
        let manager = state.database.assignments();
        manager
            .update_progress(&id, body.current_week, body.current_session_order)
            .await?;

        let updated = Self::owned_assignment(&state, &actor, &id).await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    /// Handle PUT /api/assignments/:id/status - Change lifecycle status
    async fn handle_status(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(id): Path<String>,
        Json(body): Json<UpdateStatusBody>,
    ) -> Result<Response, AppError> {
        let status = AssignmentStatus::parse(&body.status).ok_or_else(|| {
            AppError::invalid_input(format!("Unknown assignment status: {}", body.status))
        })?;

        Self::owned_assignment(&state, &actor, &id).await?;
        state
            .database
            .assignments()
            .update_status(&id, status)
            .await?;

        let updated = Self::owned_assignment(&state, &actor, &id).await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    /// Handle DELETE /api/assignments/:id - Remove an assignment and its client copy
    async fn handle_delete(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::owned_assignment(&state, &actor, &id).await?;
        state.database.assignments().delete(&id).await?;

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}
