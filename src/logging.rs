// ABOUTME: Logging configuration and structured logging setup for the Virtus server
// ABOUTME: Configures log levels, output formats, and domain event helpers on top of tracing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration
//!
//! Output is selected with `LOG_FORMAT` (`json`, `pretty`, `compact`) and the
//! filter with `RUST_LOG`. Production turns on file, thread, and span details.

use crate::config::Environment;
use anyhow::Result;
use std::env;
use std::io;
use tracing::{info, warn, Level};
use tracing_subscriber::{
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use virtus_core::constants::service_names;

/// Crates whose level follows the configured level
const WORKSPACE_TARGETS: [&str; 3] = ["virtus_server", "virtus_builder", "virtus_core"];

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base level or filter expression
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Add file, line, and thread details to every event
    pub verbose_metadata: bool,
    /// Emit span open/close events
    pub include_spans: bool,
    /// Service name attached to the startup event
    pub service_name: String,
    /// Deployment environment
    pub environment: Environment,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Multi-line human readable output
    Pretty,
    /// Single-line output without targets
    Compact,
}

impl LogFormat {
    /// Parse from the `LOG_FORMAT` value, falling back to pretty output
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            verbose_metadata: false,
            include_spans: false,
            service_name: service_names::VIRTUS_SERVER.into(),
            environment: Environment::Development,
        }
    }
}

fn directive(value: &str, fallback: Level) -> Directive {
    value.parse().unwrap_or_else(|_| fallback.into())
}

impl LoggingConfig {
    /// Read `RUST_LOG`, `LOG_FORMAT`, `ENVIRONMENT`, `SERVICE_NAME`, and the
    /// `LOG_INCLUDE_*` switches
    #[must_use]
    pub fn from_env() -> Self {
        let environment =
            Environment::from_str_or_default(&env::var("ENVIRONMENT").unwrap_or_default());
        let is_production = environment.is_production();

        Self {
            level: env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            format: env::var("LOG_FORMAT").map_or(LogFormat::Pretty, |v| LogFormat::parse(&v)),
            verbose_metadata: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_spans: is_production || env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::VIRTUS_SERVER.into()),
            environment,
        }
    }

    /// Filter built from the configured level, with chatty dependencies capped
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let filter = EnvFilter::new(&self.level)
            .add_directive(directive("hyper=warn", Level::WARN))
            .add_directive(directive("sqlx=warn", Level::WARN))
            .add_directive(directive("tower_http=info", Level::INFO));

        // Full filter expressions already name their targets
        let Ok(level) = self.level.parse::<Level>() else {
            return filter;
        };
        WORKSPACE_TARGETS.iter().fold(filter, |filter, target| {
            filter.add_directive(directive(&format!("{target}={level}"), level))
        })
    }

    /// Install the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = fmt::layer()
            .with_file(self.verbose_metadata)
            .with_line_number(self.verbose_metadata)
            .with_thread_ids(self.verbose_metadata)
            .with_writer(io::stdout)
            .with_span_events(span_events);

        match self.format {
            LogFormat::Json => registry.with(layer.json()).try_init()?,
            LogFormat::Pretty => registry.with(layer.with_target(true)).try_init()?,
            LogFormat::Compact => registry.with(layer.compact().with_target(false)).try_init()?,
        }

        info!(
            service.name = %self.service_name,
            service.version = env!("CARGO_PKG_VERSION"),
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            log.spans = self.include_spans,
            "Logging initialized"
        );
        Ok(())
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Domain event logging helpers
pub struct AppLogger;

impl AppLogger {
    /// Log a program assignment outcome
    pub fn log_assignment_event(
        coach_id: &str,
        template_id: &str,
        client_id: &str,
        event: &str,
        success: bool,
    ) {
        if success {
            info!(
                coach.id = %coach_id,
                program.template_id = %template_id,
                client.id = %client_id,
                assignment.event = %event,
                "Assignment event"
            );
        } else {
            warn!(
                coach.id = %coach_id,
                program.template_id = %template_id,
                client.id = %client_id,
                assignment.event = %event,
                "Assignment event failed"
            );
        }
    }

    /// Log a draft store operation
    pub fn log_draft_event(key: &str, event: &str) {
        info!(draft.key = %key, draft.event = %event, "Draft event");
    }
}
