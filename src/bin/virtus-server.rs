// ABOUTME: Server binary for the Virtus coaching program API
// ABOUTME: Loads env configuration, initializes logging and the database, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Virtus Server Binary
//!
//! Starts the REST API for template programs, assignments, and drafts.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use virtus_server::{
    config::{environment::ServerConfig, DatabaseUrl},
    database::Database,
    drafts::DraftStore,
    logging,
    routes::{build_router, AppState},
};

/// Interval between sweeps of expired drafts
const DRAFT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Command-line overrides for environment configuration
#[derive(Parser)]
#[command(name = "virtus-server")]
#[command(about = "Virtus coaching API - template programs, assignments and drafts")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (sqlite:path or sqlite::memory:)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url)?;
    }

    logging::init_from_env()?;

    info!("Starting Virtus server");
    info!("{}", config.summary());

    let database = Database::from_config(&config.database).await?;
    info!("Database initialized: {}", config.database.url);

    let state = Arc::new(AppState::new(database, config.clone()));
    spawn_draft_cleanup(Arc::clone(&state.drafts));

    let app = build_router(state);
    let listener = TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!("HTTP server listening on port {}", config.http_port);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Virtus server stopped");
    Ok(())
}

/// Periodically remove expired drafts
fn spawn_draft_cleanup(store: Arc<dyn DraftStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(DRAFT_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match store.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => info!("Removed {} expired drafts", removed),
                Err(e) => warn!("Draft cleanup failed: {}", e),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
