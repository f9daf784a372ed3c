// ABOUTME: Database operations for client-owned program copies
// ABOUTME: Reads copies back as workout programs and tracks per-session completion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::exercise_rows::{fetch_exercises, ExerciseTable};
use super::{db_u32, parse_timestamp};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::{BTreeMap, BTreeSet};
use virtus_core::constants::program::MIN_WEEKS;
use virtus_core::models::{ClientSessionStatus, WorkoutProgram, WorkoutSession};

/// A client-owned program record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProgram {
    /// Client program id
    pub id: String,
    /// Template the copy came from, if any
    pub template_id: Option<String>,
    /// Owning client
    pub client_id: String,
    /// Coach responsible for the client
    pub coach_id: String,
    /// Display name
    pub name: String,
    /// Training objective
    pub objective: String,
    /// Number of weeks
    pub week_count: u32,
    /// How the copy came to exist (`coach_assigned`, `client_created`)
    pub source_type: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A session of a client copy with its completion state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSession {
    /// Row id
    pub id: String,
    /// Parent client program
    pub client_program_id: String,
    /// Session id carried over from the template
    pub local_id: u32,
    /// Week number
    pub week_number: u32,
    /// Position inside the week (0-based)
    pub session_order: u32,
    /// Display name
    pub name: String,
    /// Completion state
    pub status: ClientSessionStatus,
    /// When the client completed it
    pub completed_at: Option<DateTime<Utc>>,
}

/// Client program database operations manager
pub struct ClientProgramsManager {
    pool: SqlitePool,
}

impl ClientProgramsManager {
    /// Create a new client programs manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a client program record
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: &str) -> AppResult<Option<ClientProgram>> {
        let row = sqlx::query(
            r"
            SELECT id, template_id, client_id, coach_id, name, objective, week_count,
                   source_type, created_at, updated_at
            FROM client_programs
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get client program: {e}")))?;

        row.as_ref().map(row_to_client_program).transpose()
    }

    /// List a client's programs, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_client(&self, client_id: &str) -> AppResult<Vec<ClientProgram>> {
        let rows = sqlx::query(
            r"
            SELECT id, template_id, client_id, coach_id, name, objective, week_count,
                   source_type, created_at, updated_at
            FROM client_programs
            WHERE client_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list client programs: {e}")))?;

        rows.iter().map(row_to_client_program).collect()
    }

    /// Sessions of a client program ordered by week then position
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_sessions(&self, client_program_id: &str) -> AppResult<Vec<ClientSession>> {
        let rows = sqlx::query(
            r"
            SELECT id, client_program_id, local_id, week_number, session_order, name,
                   status, completed_at
            FROM client_sessions
            WHERE client_program_id = $1
            ORDER BY week_number, session_order
            ",
        )
        .bind(client_program_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list client sessions: {e}")))?;

        rows.iter().map(row_to_client_session).collect()
    }

    /// Rebuild a client copy as a workout program
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_program(&self, id: &str) -> AppResult<Option<WorkoutProgram>> {
        let Some(record) = self.get(id).await? else {
            return Ok(None);
        };
        let sessions = self.list_sessions(id).await?;

        let mut sessions_by_week: BTreeMap<u32, Vec<WorkoutSession>> = (MIN_WEEKS
            ..=record.week_count)
            .map(|week| (week, Vec::new()))
            .collect();

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;

        for session in sessions {
            let exercises = fetch_exercises(&mut conn, ExerciseTable::Client, &session.id).await?;
            sessions_by_week
                .entry(session.week_number)
                .or_default()
                .push(WorkoutSession {
                    id: session.local_id,
                    name: session.name,
                    exercises,
                });
        }

        Ok(Some(WorkoutProgram {
            id: record.id,
            name: record.name,
            objective: record.objective,
            week_count: record.week_count,
            coach_id: record.coach_id,
            client_id: Some(record.client_id),
            sessions_by_week,
            customized_weeks: BTreeSet::new(),
        }))
    }

    /// Mark a client session as completed now
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn mark_session_completed(&self, session_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE client_sessions
            SET status = $1, completed_at = $2
            WHERE id = $3
            ",
        )
        .bind(ClientSessionStatus::Completed.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to complete session: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Find the client program owning a session
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn program_for_session(&self, session_id: &str) -> AppResult<Option<ClientProgram>> {
        let program_id: Option<String> =
            sqlx::query_scalar("SELECT client_program_id FROM client_sessions WHERE id = $1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to find session: {e}")))?;

        match program_id {
            Some(id) => self.get(&id).await,
            None => Ok(None),
        }
    }

    /// Count completed sessions in one week of a client program
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn completed_sessions_in_week(
        &self,
        client_program_id: &str,
        week_number: u32,
    ) -> AppResult<u32> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM client_sessions
            WHERE client_program_id = $1 AND week_number = $2 AND status = $3
            ",
        )
        .bind(client_program_id)
        .bind(i64::from(week_number))
        .bind(ClientSessionStatus::Completed.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count completed sessions: {e}")))?;

        Ok(db_u32(count))
    }

    /// Rename a client copy or change its objective
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the database operation fails
    pub async fn update_details(&self, id: &str, name: &str, objective: &str) -> AppResult<bool> {
        if name.trim().is_empty() {
            return Err(AppError::invalid_input("Program name cannot be empty"));
        }

        let result = sqlx::query(
            r"
            UPDATE client_programs
            SET name = $1, objective = $2, updated_at = $3
            WHERE id = $4
            ",
        )
        .bind(name.trim())
        .bind(objective)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update client program: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a `ClientProgram`
fn row_to_client_program(row: &SqliteRow) -> AppResult<ClientProgram> {
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(ClientProgram {
        id: row.get("id"),
        template_id: row.get("template_id"),
        client_id: row.get("client_id"),
        coach_id: row.get("coach_id"),
        name: row.get("name"),
        objective: row.get("objective"),
        week_count: db_u32(row.get("week_count")),
        source_type: row.get("source_type"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

/// Convert a database row to a `ClientSession`
fn row_to_client_session(row: &SqliteRow) -> AppResult<ClientSession> {
    let status: String = row.get("status");
    let completed_at: Option<String> = row.get("completed_at");

    Ok(ClientSession {
        id: row.get("id"),
        client_program_id: row.get("client_program_id"),
        local_id: db_u32(row.get("local_id")),
        week_number: db_u32(row.get("week_number")),
        session_order: db_u32(row.get("session_order")),
        name: row.get("name"),
        status: ClientSessionStatus::parse(&status),
        completed_at: completed_at.as_deref().map(parse_timestamp).transpose()?,
    })
}
