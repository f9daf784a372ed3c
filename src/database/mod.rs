// ABOUTME: Database connection management and schema creation for the Virtus server
// ABOUTME: Owns the SQLite pool and hands out per-domain managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! SQLite storage for template programs, client copies, assignments, the
//! exercise catalog, and form drafts. Each domain has a manager holding a
//! clone of the shared pool.

/// Program assignment storage
pub mod assignments;
/// Exercise catalog storage
pub mod catalog;
/// Client-owned program copies
pub mod client_programs;
/// SQLite-backed draft store
pub mod drafts;
pub(crate) mod exercise_rows;
/// Template program storage
pub mod programs;

use crate::config::{DatabaseConfig, DatabaseUrl};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

pub use assignments::AssignmentsManager;
pub use catalog::CatalogManager;
pub use client_programs::{ClientProgram, ClientProgramsManager, ClientSession};
pub use drafts::SqliteDraftStore;
pub use programs::{CreateProgramRequest, ProgramTemplate, ProgramsManager};

/// Database manager owning the connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a database URL and create any missing tables
    ///
    /// In-memory databases are limited to one pooled connection so every
    /// query sees the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or the migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        Self::connect(database_url, 5, true).await
    }

    /// Connect using loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or the migration fails
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        if let DatabaseUrl::SQLite { path } = &config.url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::config(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        Self::connect(
            &config.url.to_connection_string(),
            config.max_connections,
            config.auto_migrate,
        )
        .await
    }

    async fn connect(database_url: &str, max_connections: u32, migrate: bool) -> AppResult<Self> {
        let is_memory = database_url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(if is_memory { 1 } else { max_connections })
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        if migrate {
            db.migrate().await?;
        }
        Ok(db)
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Template program manager
    #[must_use]
    pub fn programs(&self) -> ProgramsManager {
        ProgramsManager::new(self.pool.clone())
    }

    /// Client program manager
    #[must_use]
    pub fn client_programs(&self) -> ClientProgramsManager {
        ClientProgramsManager::new(self.pool.clone())
    }

    /// Assignment manager
    #[must_use]
    pub fn assignments(&self) -> AssignmentsManager {
        AssignmentsManager::new(self.pool.clone())
    }

    /// Exercise catalog manager
    #[must_use]
    pub fn catalog(&self) -> CatalogManager {
        CatalogManager::new(self.pool.clone())
    }

    /// Draft store backed by this database
    #[must_use]
    pub fn drafts(&self) -> SqliteDraftStore {
        SqliteDraftStore::new(self.pool.clone())
    }

    /// Check that the database answers queries
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a table cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_catalog().await?;
        self.migrate_templates().await?;
        self.migrate_client_programs().await?;
        self.migrate_assignments().await?;
        self.migrate_drafts().await?;
        info!("Database schema ready");
        Ok(())
    }

    async fn execute_all(&self, statements: &[&str]) -> AppResult<()> {
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        Ok(())
    }

    async fn migrate_catalog(&self) -> AppResult<()> {
        self.execute_all(&[r"
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT,
                muscle_group TEXT,
                equipment TEXT,
                image_url TEXT,
                video_url TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "])
        .await
    }

    async fn migrate_templates(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS program_templates (
                id TEXT PRIMARY KEY,
                coach_id TEXT NOT NULL,
                name TEXT NOT NULL,
                objective TEXT NOT NULL DEFAULT '',
                week_count INTEGER NOT NULL DEFAULT 1,
                client_id TEXT,
                customized_weeks TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS template_sessions (
                id TEXT PRIMARY KEY,
                program_id TEXT NOT NULL REFERENCES program_templates(id) ON DELETE CASCADE,
                local_id INTEGER NOT NULL,
                week_number INTEGER NOT NULL,
                session_order INTEGER NOT NULL,
                name TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS template_session_exercises (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL REFERENCES template_sessions(id) ON DELETE CASCADE,
                local_id INTEGER NOT NULL,
                exercise_id TEXT NOT NULL DEFAULT '',
                name TEXT NOT NULL DEFAULT '',
                illustration_url TEXT NOT NULL DEFAULT '',
                exercise_order INTEGER NOT NULL,
                sets TEXT NOT NULL DEFAULT '',
                is_detailed INTEGER NOT NULL DEFAULT 0,
                details TEXT NOT NULL DEFAULT '[]',
                intensification TEXT NOT NULL DEFAULT '[]',
                alternatives TEXT NOT NULL DEFAULT '[]',
                notes TEXT
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_program_templates_coach ON program_templates(coach_id)",
            "CREATE INDEX IF NOT EXISTS idx_template_sessions_program ON template_sessions(program_id, week_number, session_order)",
            "CREATE INDEX IF NOT EXISTS idx_template_exercises_session ON template_session_exercises(session_id, exercise_order)",
        ])
        .await
    }

    async fn migrate_client_programs(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS client_programs (
                id TEXT PRIMARY KEY,
                template_id TEXT,
                client_id TEXT NOT NULL,
                coach_id TEXT NOT NULL,
                name TEXT NOT NULL,
                objective TEXT NOT NULL DEFAULT '',
                week_count INTEGER NOT NULL DEFAULT 1,
                source_type TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS client_sessions (
                id TEXT PRIMARY KEY,
                client_program_id TEXT NOT NULL REFERENCES client_programs(id) ON DELETE CASCADE,
                local_id INTEGER NOT NULL,
                week_number INTEGER NOT NULL,
                session_order INTEGER NOT NULL,
                name TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                completed_at TEXT
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS client_session_exercises (
                id TEXT PRIMARY KEY,
                client_session_id TEXT NOT NULL REFERENCES client_sessions(id) ON DELETE CASCADE,
                local_id INTEGER NOT NULL,
                exercise_id TEXT NOT NULL DEFAULT '',
                name TEXT NOT NULL DEFAULT '',
                illustration_url TEXT NOT NULL DEFAULT '',
                exercise_order INTEGER NOT NULL,
                sets TEXT NOT NULL DEFAULT '',
                is_detailed INTEGER NOT NULL DEFAULT 0,
                details TEXT NOT NULL DEFAULT '[]',
                intensification TEXT NOT NULL DEFAULT '[]',
                alternatives TEXT NOT NULL DEFAULT '[]',
                notes TEXT
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_client_programs_client ON client_programs(client_id)",
            "CREATE INDEX IF NOT EXISTS idx_client_sessions_program ON client_sessions(client_program_id, week_number, session_order)",
            "CREATE INDEX IF NOT EXISTS idx_client_exercises_session ON client_session_exercises(client_session_id, exercise_order)",
        ])
        .await
    }

    async fn migrate_assignments(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS program_assignments (
                id TEXT PRIMARY KEY,
                program_template_id TEXT NOT NULL,
                client_program_id TEXT NOT NULL REFERENCES client_programs(id) ON DELETE CASCADE,
                client_id TEXT NOT NULL,
                coach_id TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT,
                status TEXT NOT NULL DEFAULT 'active',
                current_week INTEGER NOT NULL DEFAULT 1,
                current_session_order INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_assignments_client ON program_assignments(client_id, status)",
            "CREATE INDEX IF NOT EXISTS idx_assignments_coach ON program_assignments(coach_id)",
            "CREATE INDEX IF NOT EXISTS idx_assignments_template ON program_assignments(program_template_id, client_id)",
        ])
        .await
    }

    async fn migrate_drafts(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS form_drafts (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                expires_at INTEGER NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_form_drafts_expiry ON form_drafts(expires_at)",
        ])
        .await
    }
}

/// Convert a count or position to a database integer
pub(crate) fn db_int(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Convert a database integer back to a week, order, or id
pub(crate) fn db_u32(n: i64) -> u32 {
    u32::try_from(n).unwrap_or(0)
}

/// Parse an RFC3339 timestamp column
pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))
}

/// Parse a `YYYY-MM-DD` date column
pub(crate) fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::internal(format!("Invalid date: {e}")))
}
