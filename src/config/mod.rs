// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-driven server, database, and draft persistence configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for the Virtus server
//!
//! - **Environment**: Server configuration from environment variables
//! - **Database**: Connection URL parsing and pool settings

use std::env;

/// Database connection configuration
pub mod database;
/// Environment and server configuration
pub mod environment;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::{DraftConfig, Environment, ServerConfig};

/// Get environment variable or default value
pub(crate) fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
