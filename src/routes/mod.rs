// ABOUTME: Route module organization for the Virtus HTTP API
// ABOUTME: Shared application state and the assembled router with tracing, timeout, and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the Virtus server
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to database managers, the editor, or services.

/// Assignment listing, progress, status, and deletion
pub mod assignments;
/// Shared exercise catalog entries
pub mod catalog;
/// Client program copies and session completion
pub mod client_programs;
/// Draft storage and server-side editor commands
pub mod drafts;
/// Health check and readiness routes
pub mod health;
/// Template program CRUD and assignment
pub mod programs;

pub use assignments::AssignmentRoutes;
pub use catalog::CatalogRoutes;
pub use client_programs::ClientProgramRoutes;
pub use drafts::DraftRoutes;
pub use health::HealthRoutes;
pub use programs::ProgramRoutes;

use crate::config::ServerConfig;
use crate::database::Database;
use crate::drafts::DraftStore;
use crate::middleware::{
    propagate_request_id_layer, request_trace_layer, set_request_id_layer, setup_cors,
};
use axum::Router;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;

/// State shared by every handler
pub struct AppState {
    /// Database handle
    pub database: Database,
    /// Loaded server configuration
    pub config: Arc<ServerConfig>,
    /// Draft backend
    pub drafts: Arc<dyn DraftStore>,
}

impl AppState {
    /// Build state backed by the database's own draft table
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        let drafts: Arc<dyn DraftStore> = Arc::new(database.drafts());
        Self {
            database,
            config: Arc::new(config),
            drafts,
        }
    }

    /// Replace the draft backend
    #[must_use]
    pub fn with_draft_store(mut self, drafts: Arc<dyn DraftStore>) -> Self {
        self.drafts = drafts;
        self
    }
}

/// Assemble every route with the HTTP middleware stack
pub fn build_router(state: Arc<AppState>) -> Router {
    let config = Arc::clone(&state.config);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&state)))
        .merge(ProgramRoutes::routes(Arc::clone(&state)))
        .merge(DraftRoutes::routes(Arc::clone(&state)))
        .merge(AssignmentRoutes::routes(Arc::clone(&state)))
        .merge(CatalogRoutes::routes(Arc::clone(&state)))
        .merge(ClientProgramRoutes::routes(state))
        .layer(propagate_request_id_layer())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(request_trace_layer())
        .layer(set_request_id_layer())
        .layer(setup_cors(&config))
}
