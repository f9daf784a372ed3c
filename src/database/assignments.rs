// ABOUTME: Database operations for program assignments linking templates to client copies
// ABOUTME: Listing, progress and status updates, cascading deletes, counts, and summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{db_u32, parse_date, parse_timestamp};
use crate::errors::{AppError, AppResult};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use virtus_core::models::{
    AssignmentStatus, AssignmentSummary, ClientSessionStatus, ProgramAssignment,
};

const ASSIGNMENT_COLUMNS: &str = "id, program_template_id, client_program_id, client_id, \
     coach_id, start_date, end_date, status, current_week, current_session_order, \
     created_at, updated_at";

/// Program assignment database operations manager
pub struct AssignmentsManager {
    pool: SqlitePool,
}

impl AssignmentsManager {
    /// Create a new assignments manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an assignment by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: &str) -> AppResult<Option<ProgramAssignment>> {
        let sql = format!("SELECT {ASSIGNMENT_COLUMNS} FROM program_assignments WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get assignment: {e}")))?;

        row.as_ref().map(row_to_assignment).transpose()
    }

    /// All assignments of a client, latest start date first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_client(&self, client_id: &str) -> AppResult<Vec<ProgramAssignment>> {
        let sql = format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM program_assignments \
             WHERE client_id = $1 ORDER BY start_date DESC"
        );
        self.fetch_list(&sql, client_id).await
    }

    /// Active assignments of a client, latest start date first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_active_for_client(
        &self,
        client_id: &str,
    ) -> AppResult<Vec<ProgramAssignment>> {
        let sql = format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM program_assignments \
             WHERE client_id = $1 AND status = 'active' ORDER BY start_date DESC"
        );
        self.fetch_list(&sql, client_id).await
    }

    /// All assignments made by a coach, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_coach(&self, coach_id: &str) -> AppResult<Vec<ProgramAssignment>> {
        let sql = format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM program_assignments \
             WHERE coach_id = $1 ORDER BY created_at DESC"
        );
        self.fetch_list(&sql, coach_id).await
    }

    async fn fetch_list(&self, sql: &str, key: &str) -> AppResult<Vec<ProgramAssignment>> {
        let rows = sqlx::query(sql)
            .bind(key)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list assignments: {e}")))?;

        rows.iter().map(row_to_assignment).collect()
    }

    /// Move the client's position in the program
    ///
    /// # Errors
    ///
    /// Returns an error if a position is zero or the database operation fails
    pub async fn update_progress(
        &self,
        id: &str,
        current_week: u32,
        current_session_order: u32,
    ) -> AppResult<bool> {
        if current_week == 0 || current_session_order == 0 {
            return Err(AppError::invalid_input(
                "Week and session order start at 1",
            ));
        }

        let result = sqlx::query(
            r"
            UPDATE program_assignments
            SET current_week = $1, current_session_order = $2, updated_at = $3
            WHERE id = $4
            ",
        )
        .bind(i64::from(current_week))
        .bind(i64::from(current_session_order))
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update progress: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Change the lifecycle status
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update_status(&self, id: &str, status: AssignmentStatus) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE program_assignments
            SET status = $1, updated_at = $2
            WHERE id = $3
            ",
        )
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update status: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an assignment together with its client copy
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let client_program_id: Option<String> = sqlx::query_scalar(
            "SELECT client_program_id FROM program_assignments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to find assignment: {e}")))?;

        let Some(client_program_id) = client_program_id else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM program_assignments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete assignment: {e}")))?;

        sqlx::query("DELETE FROM client_programs WHERE id = $1")
            .bind(&client_program_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete client program: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit delete: {e}")))?;

        Ok(true)
    }

    /// Number of upcoming or active assignments per template for a coach
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn count_by_template(&self, coach_id: &str) -> AppResult<HashMap<String, u32>> {
        let rows = sqlx::query(
            r"
            SELECT program_template_id, COUNT(*) AS assignment_count
            FROM program_assignments
            WHERE coach_id = $1 AND status IN ('active', 'upcoming')
            GROUP BY program_template_id
            ",
        )
        .bind(coach_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count assignments: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| {
                (
                    row.get("program_template_id"),
                    db_u32(row.get("assignment_count")),
                )
            })
            .collect())
    }

    /// Assignment with session completion statistics
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn summary(&self, id: &str) -> AppResult<Option<AssignmentSummary>> {
        let Some(assignment) = self.get(id).await? else {
            return Ok(None);
        };

        let row = sqlx::query(
            r"
            SELECT cp.name AS program_name,
                   cp.week_count AS week_count,
                   COUNT(cs.id) AS total_sessions,
                   COALESCE(SUM(CASE WHEN cs.status = $2 THEN 1 ELSE 0 END), 0) AS completed_sessions
            FROM client_programs cp
            LEFT JOIN client_sessions cs ON cs.client_program_id = cp.id
            WHERE cp.id = $1
            GROUP BY cp.id
            ",
        )
        .bind(&assignment.client_program_id)
        .bind(ClientSessionStatus::Completed.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to summarize assignment: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let total_sessions = db_u32(row.get("total_sessions"));
        let completed_sessions = db_u32(row.get("completed_sessions"));

        Ok(Some(AssignmentSummary {
            program_name: row.get("program_name"),
            week_count: db_u32(row.get("week_count")),
            total_sessions,
            completed_sessions,
            progress_percentage: AssignmentSummary::percentage(completed_sessions, total_sessions),
            assignment,
        }))
    }

    /// Whether an upcoming or active assignment exists for a template and client
    ///
    /// Takes a connection so it can run inside the assignment transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn has_open_assignment(
        conn: &mut SqliteConnection,
        template_id: &str,
        client_id: &str,
    ) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM program_assignments
            WHERE program_template_id = $1 AND client_id = $2
              AND status IN ('active', 'upcoming')
            ",
        )
        .bind(template_id)
        .bind(client_id)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to check assignments: {e}")))?;

        Ok(count > 0)
    }
}

/// Convert a database row to a `ProgramAssignment`
fn row_to_assignment(row: &SqliteRow) -> AppResult<ProgramAssignment> {
    let status: String = row.get("status");
    let start_date: String = row.get("start_date");
    let end_date: Option<String> = row.get("end_date");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(ProgramAssignment {
        id: row.get("id"),
        program_template_id: row.get("program_template_id"),
        client_program_id: row.get("client_program_id"),
        client_id: row.get("client_id"),
        coach_id: row.get("coach_id"),
        start_date: parse_date(&start_date)?,
        end_date: end_date.as_deref().map(parse_date).transpose()?,
        status: AssignmentStatus::parse(&status)
            .ok_or_else(|| AppError::internal(format!("Unknown assignment status: {status}")))?,
        current_week: db_u32(row.get("current_week")),
        current_session_order: db_u32(row.get("current_session_order")),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
