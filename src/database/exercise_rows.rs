// ABOUTME: Shared row mapping for template and client session exercises
// ABOUTME: Both tables carry identical set parameter columns, stored as JSON where nested
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{db_int, db_u32};
use crate::errors::{AppError, AppResult};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};
use uuid::Uuid;
use virtus_core::models::WorkoutExercise;

/// Which exercise table to target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExerciseTable {
    /// Exercises of template sessions
    Template,
    /// Exercises of client sessions
    Client,
}

impl ExerciseTable {
    const fn table(self) -> &'static str {
        match self {
            Self::Template => "template_session_exercises",
            Self::Client => "client_session_exercises",
        }
    }

    const fn session_column(self) -> &'static str {
        match self {
            Self::Template => "session_id",
            Self::Client => "client_session_id",
        }
    }
}

/// Columns selected by [`row_to_exercise`]
pub(crate) const EXERCISE_COLUMNS: &str = "local_id, exercise_id, name, illustration_url, \
     exercise_order, sets, is_detailed, details, intensification, alternatives, notes";

/// Insert one exercise row at the given position of a session
pub(crate) async fn insert_exercise(
    conn: &mut SqliteConnection,
    table: ExerciseTable,
    session_id: &str,
    order: usize,
    exercise: &WorkoutExercise,
) -> AppResult<()> {
    let sql = format!(
        "INSERT INTO {} (id, {}, local_id, exercise_id, name, illustration_url, exercise_order, \
         sets, is_detailed, details, intensification, alternatives, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        table.table(),
        table.session_column()
    );

    sqlx::query(&sql)
        .bind(Uuid::new_v4().to_string())
        .bind(session_id)
        .bind(i64::from(exercise.id))
        .bind(&exercise.exercise_id)
        .bind(&exercise.name)
        .bind(&exercise.illustration_url)
        .bind(db_int(order))
        .bind(&exercise.sets)
        .bind(exercise.is_detailed)
        .bind(serde_json::to_string(&exercise.details)?)
        .bind(serde_json::to_string(&exercise.intensification)?)
        .bind(serde_json::to_string(&exercise.alternatives)?)
        .bind(&exercise.notes)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to insert into {}: {e}", table.table()))
        })?;

    Ok(())
}

/// Fetch the exercises of one session ordered by position
pub(crate) async fn fetch_exercises(
    conn: &mut SqliteConnection,
    table: ExerciseTable,
    session_id: &str,
) -> AppResult<Vec<WorkoutExercise>> {
    let sql = format!(
        "SELECT {EXERCISE_COLUMNS} FROM {} WHERE {} = $1 ORDER BY exercise_order",
        table.table(),
        table.session_column()
    );

    let rows = sqlx::query(&sql)
        .bind(session_id)
        .fetch_all(conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to read {}: {e}", table.table())))?;

    rows.iter().map(row_to_exercise).collect()
}

/// Convert a database row to a `WorkoutExercise`
pub(crate) fn row_to_exercise(row: &SqliteRow) -> AppResult<WorkoutExercise> {
    let details_json: String = row.get("details");
    let intensification_json: String = row.get("intensification");
    let alternatives_json: String = row.get("alternatives");
    let is_detailed: i64 = row.get("is_detailed");

    Ok(WorkoutExercise {
        id: db_u32(row.get("local_id")),
        exercise_id: row.get("exercise_id"),
        name: row.get("name"),
        illustration_url: row.get("illustration_url"),
        sets: row.get("sets"),
        is_detailed: is_detailed == 1,
        details: serde_json::from_str(&details_json)?,
        intensification: serde_json::from_str(&intensification_json)?,
        alternatives: serde_json::from_str(&alternatives_json)?,
        notes: row.get("notes"),
    })
}
