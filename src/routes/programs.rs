// ABOUTME: Route handlers for the template program REST API
// ABOUTME: Template CRUD, full structure save and load, assignment to clients, and assignment counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Template program routes
//!
//! Every endpoint acts for the coach named in the `X-Coach-Id` header and only
//! sees that coach's templates.

use super::AppState;
use crate::{
    context::ActorContext,
    database::{CreateProgramRequest, ProgramTemplate},
    errors::AppError,
    services::assign_program_to_client,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use virtus_core::models::WorkoutProgram;

/// Response for listing templates
#[derive(Debug, Serialize, Deserialize)]
pub struct ListProgramsResponse {
    /// Templates, most recently updated first
    pub programs: Vec<ProgramTemplate>,
    /// Number of templates returned
    pub total: usize,
}

/// Request body for assigning a template
#[derive(Debug, Deserialize)]
pub struct AssignProgramBody {
    /// Receiving client
    pub client_id: String,
    /// First day of the program (defaults to today)
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// Response for assignment counts
#[derive(Debug, Serialize, Deserialize)]
pub struct AssignmentCountsResponse {
    /// Upcoming or active assignments per template id
    pub counts: HashMap<String, u32>,
}

/// Template program routes handler
pub struct ProgramRoutes;

impl ProgramRoutes {
    /// Create all template program routes
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(
                "/api/programs",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/programs/assignment-counts",
                get(Self::handle_assignment_counts),
            )
            .route(
                "/api/programs/:id",
                get(Self::handle_get)
                    .put(Self::handle_save)
                    .delete(Self::handle_delete),
            )
            .route("/api/programs/:id/assignments", post(Self::handle_assign))
            .with_state(state)
    }

    /// Handle GET /api/programs - List the coach's templates
    async fn handle_list(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
    ) -> Result<Response, AppError> {
        let programs = state
            .database
            .programs()
            .list_for_coach(&actor.coach_id)
            .await?;

        let response = ListProgramsResponse {
            total: programs.len(),
            programs,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/programs - Create a template
    async fn handle_create(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Json(body): Json<CreateProgramRequest>,
    ) -> Result<Response, AppError> {
        let template = state
            .database
            .programs()
            .create(&actor.coach_id, &body)
            .await?;

        Ok((StatusCode::CREATED, Json(template)).into_response())
    }

    /// Handle GET /api/programs/:id - Load the full editable program
    async fn handle_get(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let program = state
            .database
            .programs()
            .load(&id, &actor.coach_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Program {id}")))?;

        Ok((StatusCode::OK, Json(program)).into_response())
    }

    /// Handle PUT /api/programs/:id - Replace details and structure
    async fn handle_save(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(id): Path<String>,
        Json(mut program): Json<WorkoutProgram>,
    ) -> Result<Response, AppError> {
        program.id = id;
        program.coach_id.clone_from(&actor.coach_id);

        let programs = state.database.programs();
        programs.save_structure(&actor.coach_id, &program).await?;
        let saved = programs
            .load(&program.id, &actor.coach_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Program {}", program.id)))?;

        Ok((StatusCode::OK, Json(saved)).into_response())
    }

    /// Handle DELETE /api/programs/:id - Delete a template
    async fn handle_delete(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let deleted = state
            .database
            .programs()
            .delete(&id, &actor.coach_id)
            .await?;

        if !deleted {
            return Err(AppError::not_found(format!("Program {id}")));
        }

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    /// Handle POST /api/programs/:id/assignments - Assign to a client
    async fn handle_assign(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(id): Path<String>,
        Json(body): Json<AssignProgramBody>,
    ) -> Result<Response, AppError> {
        let start_date = body
            .start_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let result =
            assign_program_to_client(&state.database, &actor, &id, &body.client_id, start_date)
                .await?;

        Ok((StatusCode::CREATED, Json(result)).into_response())
    }

    /// Handle GET /api/programs/assignment-counts - Open assignments per template
    async fn handle_assignment_counts(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
    ) -> Result<Response, AppError> {
        let counts = state
            .database
            .assignments()
            .count_by_template(&actor.coach_id)
            .await?;

        Ok((StatusCode::OK, Json(AssignmentCountsResponse { counts })).into_response())
    }
}
