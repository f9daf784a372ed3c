// ABOUTME: Database operations for coach-owned template programs
// ABOUTME: Template CRUD plus transactional save and load of the full week/session/exercise tree
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::exercise_rows::{fetch_exercises, insert_exercise, ExerciseTable};
use super::{db_int, db_u32, parse_timestamp, CatalogManager};
use crate::errors::{AppError, AppResult, ErrorCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;
use uuid::Uuid;
use virtus_builder::ProgramEditor;
use virtus_core::constants::program::{MAX_WEEKS, MIN_WEEKS, TEMPLATE_WEEK};
use virtus_core::models::{WorkoutProgram, WorkoutSession};

/// A template program record without its session tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramTemplate {
    /// Template id
    pub id: String,
    /// Owning coach
    pub coach_id: String,
    /// Display name
    pub name: String,
    /// Training objective
    pub objective: String,
    /// Number of weeks
    pub week_count: u32,
    /// Client the template was prepared for, if any
    pub client_id: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new template program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProgramRequest {
    /// Display name
    pub name: String,
    /// Training objective
    #[serde(default)]
    pub objective: String,
    /// Number of weeks (defaults to 1)
    #[serde(default)]
    pub week_count: Option<u32>,
    /// Client the template is prepared for
    #[serde(default)]
    pub client_id: Option<String>,
}

/// A template session row as stored
#[derive(Debug, Clone)]
pub(crate) struct SessionRow {
    pub id: String,
    pub local_id: u32,
    pub week_number: u32,
    pub session_order: u32,
    pub name: String,
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::new(
            ErrorCode::MissingRequiredField,
            "Program name cannot be empty",
        ));
    }
    Ok(())
}

fn validate_week_count(week_count: u32) -> AppResult<()> {
    if (MIN_WEEKS..=MAX_WEEKS).contains(&week_count) {
        Ok(())
    } else {
        Err(AppError::new(
            ErrorCode::ValueOutOfRange,
            format!("Week count must be between {MIN_WEEKS} and {MAX_WEEKS}, got {week_count}"),
        ))
    }
}

/// Template program database operations manager
pub struct ProgramsManager {
    pool: SqlitePool,
}

impl ProgramsManager {
    /// Create a new programs manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a template with one empty session copied into every week
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the week count is out of range,
    /// or the database operation fails
    pub async fn create(
        &self,
        coach_id: &str,
        request: &CreateProgramRequest,
    ) -> AppResult<ProgramTemplate> {
        validate_name(&request.name)?;
        let week_count = request.week_count.unwrap_or(MIN_WEEKS);
        validate_week_count(week_count)?;

        let id = Uuid::new_v4().to_string();
        let mut editor = ProgramEditor::new(id.clone(), coach_id);
        editor.set_name(&request.name)?;
        editor.set_objective(&request.objective);
        editor.set_client(request.client_id.clone());
        editor.set_week_count(i64::from(week_count));
        let program = editor.into_program();

        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO program_templates (
                id, coach_id, name, objective, week_count, client_id, customized_weeks,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, '[]', $7, $7)
            ",
        )
        .bind(&id)
        .bind(coach_id)
        .bind(&program.name)
        .bind(&program.objective)
        .bind(i64::from(program.week_count))
        .bind(&program.client_id)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create program: {e}")))?;

        write_sessions(&mut tx, &id, &program).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit program: {e}")))?;

        Ok(ProgramTemplate {
            id,
            coach_id: coach_id.to_owned(),
            name: program.name,
            objective: program.objective,
            week_count: program.week_count,
            client_id: program.client_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a template record owned by a coach
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: &str, coach_id: &str) -> AppResult<Option<ProgramTemplate>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        fetch_template(&mut conn, id, coach_id).await
    }

    /// List a coach's templates, most recently updated first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_coach(&self, coach_id: &str) -> AppResult<Vec<ProgramTemplate>> {
        let rows = sqlx::query(
            r"
            SELECT id, coach_id, name, objective, week_count, client_id, created_at, updated_at
            FROM program_templates
            WHERE coach_id = $1
            ORDER BY updated_at DESC
            ",
        )
        .bind(coach_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list programs: {e}")))?;

        rows.iter().map(row_to_template).collect()
    }

    /// Rename a template or change its objective
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the database operation fails
    pub async fn update_details(
        &self,
        id: &str,
        coach_id: &str,
        name: &str,
        objective: &str,
    ) -> AppResult<bool> {
        validate_name(name)?;

        let result = sqlx::query(
            r"
            UPDATE program_templates
            SET name = $1, objective = $2, updated_at = $3
            WHERE id = $4 AND coach_id = $5
            ",
        )
        .bind(name.trim())
        .bind(objective)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(coach_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update program: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a template and its sessions; client copies are not affected
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, id: &str, coach_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM program_templates WHERE id = $1 AND coach_id = $2")
            .bind(id)
            .bind(coach_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete program: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace a template's details and whole session tree with the given program
    ///
    /// Runs in a single transaction: either the full tree is written or the
    /// previous one is kept. Missing weeks are filled from week 1 and weeks
    /// past `week_count` are dropped before writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not exist for this coach, the
    /// program is invalid, or the database operation fails
    pub async fn save_structure(&self, coach_id: &str, program: &WorkoutProgram) -> AppResult<()> {
        validate_name(&program.name)?;
        validate_week_count(program.week_count)?;
        let program = &ProgramEditor::from_program(program.clone()).into_program();

        let customized: Vec<u32> = program.customized_weeks.iter().copied().collect();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let updated = sqlx::query(
            r"
            UPDATE program_templates
            SET name = $1, objective = $2, week_count = $3, client_id = $4,
                customized_weeks = $5, updated_at = $6
            WHERE id = $7 AND coach_id = $8
            ",
        )
        .bind(program.name.trim())
        .bind(&program.objective)
        .bind(i64::from(program.week_count))
        .bind(&program.client_id)
        .bind(serde_json::to_string(&customized)?)
        .bind(Utc::now().to_rfc3339())
        .bind(&program.id)
        .bind(coach_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update program: {e}")))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found("Program").with_resource_id(program.id.clone()));
        }

        sqlx::query("DELETE FROM template_sessions WHERE program_id = $1")
            .bind(&program.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear sessions: {e}")))?;

        write_sessions(&mut tx, &program.id, program).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit program: {e}")))?;

        debug!(program_id = %program.id, weeks = program.week_count, "Program structure saved");
        Ok(())
    }

    /// Rebuild the editable program from storage
    ///
    /// Linked exercises take their name and illustration from the catalog.
    /// A week is reported as customized when it was saved as such or when its
    /// content differs from week 1.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn load(&self, id: &str, coach_id: &str) -> AppResult<Option<WorkoutProgram>> {
        let row = sqlx::query(
            r"
            SELECT id, coach_id, name, objective, week_count, client_id, customized_weeks
            FROM program_templates
            WHERE id = $1 AND coach_id = $2
            ",
        )
        .bind(id)
        .bind(coach_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load program: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let week_count = db_u32(row.get("week_count"));
        let stored_customized: Vec<u32> =
            serde_json::from_str(&row.get::<String, _>("customized_weeks"))?;

        let mut sessions_by_week: BTreeMap<u32, Vec<WorkoutSession>> = (MIN_WEEKS..=week_count)
            .map(|week| (week, Vec::new()))
            .collect();
        {
            let mut conn = self
                .pool
                .acquire()
                .await
                .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;

            for session in fetch_template_sessions(&mut conn, id).await? {
                let exercises =
                    fetch_exercises(&mut conn, ExerciseTable::Template, &session.id).await?;
                if let Some(week) = sessions_by_week.get_mut(&session.week_number) {
                    week.push(WorkoutSession {
                        id: session.local_id,
                        name: session.name,
                        exercises,
                    });
                }
            }
        }

        resolve_catalog_names(&CatalogManager::new(self.pool.clone()), &mut sessions_by_week)
            .await?;

        let template = sessions_by_week
            .get(&TEMPLATE_WEEK)
            .cloned()
            .unwrap_or_default();
        let customized_weeks: BTreeSet<u32> = stored_customized
            .into_iter()
            .chain(
                sessions_by_week
                    .iter()
                    .filter(|(week, sessions)| **week > TEMPLATE_WEEK && **sessions != template)
                    .map(|(week, _)| *week),
            )
            .filter(|week| *week > TEMPLATE_WEEK && *week <= week_count)
            .collect();

        Ok(Some(WorkoutProgram {
            id: row.get("id"),
            name: row.get("name"),
            objective: row.get("objective"),
            week_count,
            coach_id: row.get("coach_id"),
            client_id: row.get("client_id"),
            sessions_by_week,
            customized_weeks,
        }))
    }
}

async fn resolve_catalog_names(
    catalog: &CatalogManager,
    sessions_by_week: &mut BTreeMap<u32, Vec<WorkoutSession>>,
) -> AppResult<()> {
    let ids: Vec<String> = sessions_by_week
        .values()
        .flatten()
        .flat_map(|session| session.exercises.iter())
        .map(|exercise| exercise.exercise_id.clone())
        .collect();
    let infos = catalog.get_by_ids(&ids).await?;
    if infos.is_empty() {
        return Ok(());
    }

    for exercise in sessions_by_week
        .values_mut()
        .flatten()
        .flat_map(|session| session.exercises.iter_mut())
    {
        if let Some(info) = infos.get(&exercise.exercise_id) {
            exercise.name.clone_from(&info.name);
            exercise.illustration_url.clone_from(&info.illustration_url);
        }
    }
    Ok(())
}

/// Insert every session and exercise of a program under a template id
async fn write_sessions(
    conn: &mut SqliteConnection,
    program_id: &str,
    program: &WorkoutProgram,
) -> AppResult<()> {
    for (week, sessions) in &program.sessions_by_week {
        for (order, session) in sessions.iter().enumerate() {
            let session_id = Uuid::new_v4().to_string();
            sqlx::query(
                r"
                INSERT INTO template_sessions (
                    id, program_id, local_id, week_number, session_order, name
                ) VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(&session_id)
            .bind(program_id)
            .bind(i64::from(session.id))
            .bind(i64::from(*week))
            .bind(db_int(order))
            .bind(&session.name)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert session: {e}")))?;

            for (position, exercise) in session.exercises.iter().enumerate() {
                insert_exercise(
                    &mut *conn,
                    ExerciseTable::Template,
                    &session_id,
                    position,
                    exercise,
                )
                .await?;
            }
        }
    }
    Ok(())
}

/// Fetch a template record owned by a coach on an existing connection
pub(crate) async fn fetch_template(
    conn: &mut SqliteConnection,
    id: &str,
    coach_id: &str,
) -> AppResult<Option<ProgramTemplate>> {
    let row = sqlx::query(
        r"
        SELECT id, coach_id, name, objective, week_count, client_id, created_at, updated_at
        FROM program_templates
        WHERE id = $1 AND coach_id = $2
        ",
    )
    .bind(id)
    .bind(coach_id)
    .fetch_optional(conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to get program: {e}")))?;

    row.as_ref().map(row_to_template).transpose()
}

/// Fetch a template's sessions within `1..=week_count`, ordered by week then position
pub(crate) async fn fetch_template_sessions(
    conn: &mut SqliteConnection,
    program_id: &str,
) -> AppResult<Vec<SessionRow>> {
    let rows = sqlx::query(
        r"
        SELECT s.id, s.local_id, s.week_number, s.session_order, s.name
        FROM template_sessions s
        JOIN program_templates p ON p.id = s.program_id
        WHERE s.program_id = $1 AND s.week_number BETWEEN 1 AND p.week_count
        ORDER BY s.week_number, s.session_order
        ",
    )
    .bind(program_id)
    .fetch_all(conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to read sessions: {e}")))?;

    Ok(rows
        .iter()
        .map(|row| SessionRow {
            id: row.get("id"),
            local_id: db_u32(row.get("local_id")),
            week_number: db_u32(row.get("week_number")),
            session_order: db_u32(row.get("session_order")),
            name: row.get("name"),
        })
        .collect())
}

/// Convert a database row to a `ProgramTemplate`
fn row_to_template(row: &SqliteRow) -> AppResult<ProgramTemplate> {
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(ProgramTemplate {
        id: row.get("id"),
        coach_id: row.get("coach_id"),
        name: row.get("name"),
        objective: row.get("objective"),
        week_count: db_u32(row.get("week_count")),
        client_id: row.get("client_id"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
