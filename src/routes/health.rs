// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Liveness reports the process is up; readiness also checks the database answers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use super::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;
use tracing::warn;
use virtus_core::constants::service_names::VIRTUS_SERVER;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(state: Arc<AppState>) -> Router {
        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "service": VIRTUS_SERVER,
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        async fn ready_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
            match state.database.ping().await {
                Ok(()) => (
                    StatusCode::OK,
                    Json(serde_json::json!({
                        "status": "ready",
                        "timestamp": chrono::Utc::now().to_rfc3339()
                    })),
                ),
                Err(e) => {
                    warn!("Readiness check failed: {e}");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        Json(serde_json::json!({
                            "status": "unavailable",
                            "timestamp": chrono::Utc::now().to_rfc3339()
                        })),
                    )
                }
            }
        }

        Router::new()
            .route("/health", get(health_handler))
            .route("/ready", get(ready_handler))
            .with_state(state)
    }
}
