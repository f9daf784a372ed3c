// ABOUTME: Route handlers for the shared exercise catalog
// ABOUTME: Coaches add or update library entries that template exercises link to
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::AppState;
use crate::{context::ActorContext, errors::AppError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use virtus_core::models::CatalogExercise;

/// Request body for adding or updating a catalog entry
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntryBody {
    /// Display name
    pub name: String,
    /// Category (musculation, cardio, mobility, ...)
    #[serde(default)]
    pub category: Option<String>,
    /// Primary muscle group
    #[serde(default)]
    pub muscle_group: Option<String>,
    /// Required equipment
    #[serde(default)]
    pub equipment: Option<String>,
    /// Illustration URL
    #[serde(default)]
    pub illustration_url: Option<String>,
    /// Demonstration video URL
    #[serde(default)]
    pub video_url: Option<String>,
}

/// Catalog routes handler
pub struct CatalogRoutes;

impl CatalogRoutes {
    /// Create all catalog routes
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(
                "/api/catalog/exercises/:id",
                get(Self::handle_get).put(Self::handle_upsert),
            )
            .with_state(state)
    }

    /// Handle GET /api/catalog/exercises/:id - Read a catalog entry
    async fn handle_get(
        State(state): State<Arc<AppState>>,
        _actor: ActorContext,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let exercise = state
            .database
            .catalog()
            .get(&id)
            .await?
            .ok_or_else(|| AppError::not_found("Exercise").with_resource_id(id))?;

        Ok((StatusCode::OK, Json(exercise)).into_response())
    }

    /// Handle PUT /api/catalog/exercises/:id - Add or replace a catalog entry
    async fn handle_upsert(
        State(state): State<Arc<AppState>>,
        actor: ActorContext,
        Path(id): Path<String>,
        Json(body): Json<CatalogEntryBody>,
    ) -> Result<Response, AppError> {
        let name = body.name.trim();
        if id.trim().is_empty() || name.is_empty() {
            return Err(AppError::invalid_input(
                "Catalog exercise id and name cannot be empty",
            ));
        }

        let exercise = CatalogExercise {
            id,
            name: name.to_owned(),
            category: body.category,
            muscle_group: body.muscle_group,
            equipment: body.equipment,
            illustration_url: body.illustration_url,
            video_url: body.video_url,
        };
        state.database.catalog().upsert(&exercise).await?;
        info!(coach.id = %actor.coach_id, exercise.id = %exercise.id, "Catalog exercise saved");

        Ok((StatusCode::OK, Json(exercise)).into_response())
    }
}
