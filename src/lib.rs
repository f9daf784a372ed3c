// ABOUTME: Main library entry point for the Virtus coaching program service
// ABOUTME: Template program storage, client assignment, draft persistence, and the REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Virtus Server
//!
//! Backend for coaches building multi-week workout programs and handing them
//! out to clients.
//!
//! ## Features
//!
//! - **Template programs**: week 1 acts as the template for every later week
//!   until the coach customizes one (editing lives in `virtus-builder`)
//! - **Assignments**: a template is copied into an independent client program
//!   in one transaction
//! - **Drafts**: expiring snapshots of in-progress edits with debounced autosave
//! - **REST API**: `axum` routes acting for the coach named in `X-Coach-Id`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use virtus_server::config::environment::ServerConfig;
//! use virtus_server::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Virtus server configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Acting coach identity
pub mod context;

/// SQLite storage and per-domain managers
pub mod database;

/// Expiring draft persistence and autosave
pub mod drafts;

/// Error types shared with the core crate
pub mod errors;

/// Structured logging setup and domain event helpers
pub mod logging;

/// HTTP middleware (tracing, CORS)
pub mod middleware;

/// HTTP route handlers
pub mod routes;

/// Multi-table business operations
pub mod services;

pub use virtus_builder as builder;
pub use virtus_core::{constants, models};
