// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, draft persistence timings, and request limits from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use super::database::DatabaseConfig;
use super::env_var_or;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use virtus_core::constants::drafts;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Draft persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftConfig {
    /// Hours before a saved draft expires
    pub ttl_hours: u64,
    /// Quiet period before an autosave is written
    pub debounce_ms: u64,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            debounce_ms: drafts::DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl DraftConfig {
    /// Time-to-live in milliseconds
    #[must_use]
    pub fn ttl_ms(&self) -> i64 {
        i64::try_from(self.ttl_hours.saturating_mul(60 * 60 * 1000))
            .unwrap_or(drafts::DEFAULT_TTL_MS)
    }

    /// Debounce delay
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Draft persistence configuration
    pub drafts: DraftConfig,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Comma-separated CORS origins, `*` for any
    pub cors_allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8081,
            environment: Environment::Development,
            database: DatabaseConfig::default(),
            drafts: DraftConfig::default(),
            request_timeout_secs: 30,
            cors_allowed_origins: "*".to_owned(),
        }
    }
}

fn parse_var<T>(key: &str, default: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    env_var_or(key, default)
        .parse()
        .map_err(|e| AppError::config(format!("Invalid {key} value: {e}")))
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: parse_var("HTTP_PORT", "8081")?,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            database: DatabaseConfig::from_env()?,
            drafts: DraftConfig {
                ttl_hours: parse_var("DRAFT_TTL_HOURS", "24")?,
                debounce_ms: parse_var(
                    "DRAFT_DEBOUNCE_MS",
                    &drafts::DEFAULT_DEBOUNCE_MS.to_string(),
                )?,
            },
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", "30")?,
            cors_allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of its accepted range
    pub fn validate(&self) -> AppResult<()> {
        if self.drafts.ttl_hours == 0 {
            return Err(AppError::config("DRAFT_TTL_HOURS must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::config("REQUEST_TIMEOUT_SECS must be at least 1"));
        }
        if self.database.max_connections == 0 {
            return Err(AppError::config("DATABASE_MAX_CONNECTIONS must be at least 1"));
        }
        Ok(())
    }

    /// Per-request timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Human-readable configuration summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Virtus Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Draft TTL: {}h (debounce {}ms)\n\
             - Request Timeout: {}s",
            self.http_port,
            self.environment,
            self.database.url,
            self.drafts.ttl_hours,
            self.drafts.debounce_ms,
            self.request_timeout_secs,
        )
    }
}
