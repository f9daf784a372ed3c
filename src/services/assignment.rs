// ABOUTME: Program assignment service copying a template into client-owned records
// ABOUTME: Duplicates program, sessions, and exercises inside one transaction and records the assignment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::context::ActorContext;
use crate::database::assignments::AssignmentsManager;
use crate::database::exercise_rows::{fetch_exercises, insert_exercise, ExerciseTable};
use crate::database::programs::{fetch_template, fetch_template_sessions};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use chrono::{NaiveDate, Utc};
use sqlx::SqliteConnection;
use uuid::Uuid;
use virtus_core::constants::assignments::{
    INITIAL_SESSION_ORDER, INITIAL_WEEK, SOURCE_COACH_ASSIGNED,
};
use virtus_core::models::{AssignProgramResult, AssignmentStatus, ClientSessionStatus};

/// Copy a coach's template into an independent client program and assign it
///
/// The client program, its sessions and exercises, and the assignment record
/// are written in a single transaction. Later template edits do not reach the
/// copy.
///
/// # Errors
///
/// - `ResourceNotFound` if the template does not exist for the acting coach
/// - `ResourceAlreadyExists` if the client already has an upcoming or active
///   assignment of this template
/// - `InvalidInput` if the client id is blank
/// - `DatabaseError` if any write fails; nothing is persisted in that case
pub async fn assign_program_to_client(
    database: &Database,
    actor: &ActorContext,
    template_id: &str,
    client_id: &str,
    start_date: NaiveDate,
) -> AppResult<AssignProgramResult> {
    if client_id.trim().is_empty() {
        return Err(AppError::invalid_input("Client id cannot be empty"));
    }

    let outcome = copy_and_assign(database, actor, template_id, client_id, start_date).await;

    AppLogger::log_assignment_event(
        &actor.coach_id,
        template_id,
        client_id,
        "assign_program",
        outcome.is_ok(),
    );
    outcome
}

async fn copy_and_assign(
    database: &Database,
    actor: &ActorContext,
    template_id: &str,
    client_id: &str,
    start_date: NaiveDate,
) -> AppResult<AssignProgramResult> {
    let mut tx = database
        .pool()
        .begin()
        .await
        .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

    let template = fetch_template(&mut tx, template_id, &actor.coach_id)
        .await?
        .ok_or_else(|| AppError::not_found("Program").with_resource_id(template_id))?;

    if AssignmentsManager::has_open_assignment(&mut tx, template_id, client_id).await? {
        return Err(AppError::already_exists(format!(
            "Program {template_id} is already assigned to client {client_id}"
        )));
    }

    let now = Utc::now().to_rfc3339();
    let client_program_id = Uuid::new_v4().to_string();

    sqlx::query(
        r"
        INSERT INTO client_programs (
            id, template_id, client_id, coach_id, name, objective, week_count,
            source_type, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        ",
    )
    .bind(&client_program_id)
    .bind(template_id)
    .bind(client_id)
    .bind(&actor.coach_id)
    .bind(&template.name)
    .bind(&template.objective)
    .bind(i64::from(template.week_count))
    .bind(SOURCE_COACH_ASSIGNED)
    .bind(&now)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::database(format!("Failed to create client program: {e}")))?;

    let (sessions_copied, exercises_copied) =
        copy_sessions(&mut tx, template_id, &client_program_id).await?;

    let assignment_id = Uuid::new_v4().to_string();
    sqlx::query(
        r"
        INSERT INTO program_assignments (
            id, program_template_id, client_program_id, client_id, coach_id,
            start_date, status, current_week, current_session_order, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        ",
    )
    .bind(&assignment_id)
    .bind(template_id)
    .bind(&client_program_id)
    .bind(client_id)
    .bind(&actor.coach_id)
    .bind(start_date.format("%Y-%m-%d").to_string())
    .bind(AssignmentStatus::Active.as_str())
    .bind(i64::from(INITIAL_WEEK))
    .bind(i64::from(INITIAL_SESSION_ORDER))
    .bind(&now)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::database(format!("Failed to record assignment: {e}")))?;

    tx.commit()
        .await
        .map_err(|e| AppError::database(format!("Failed to commit assignment: {e}")))?;

    Ok(AssignProgramResult {
        assignment_id,
        client_program_id,
        sessions_copied,
        exercises_copied,
    })
}

/// Copy every template session and its exercises under a client program
///
/// Returns the number of sessions and exercises written.
async fn copy_sessions(
    conn: &mut SqliteConnection,
    template_id: &str,
    client_program_id: &str,
) -> AppResult<(usize, usize)> {
    let sessions = fetch_template_sessions(&mut *conn, template_id).await?;
    let mut exercises_copied = 0;

    for session in &sessions {
        let client_session_id = Uuid::new_v4().to_string();
        sqlx::query(
            r"
            INSERT INTO client_sessions (
                id, client_program_id, local_id, week_number, session_order, name, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&client_session_id)
        .bind(client_program_id)
        .bind(i64::from(session.local_id))
        .bind(i64::from(session.week_number))
        .bind(i64::from(session.session_order))
        .bind(&session.name)
        .bind(ClientSessionStatus::Pending.as_str())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to copy session: {e}")))?;

        let exercises = fetch_exercises(&mut *conn, ExerciseTable::Template, &session.id).await?;
        for (order, exercise) in exercises.iter().enumerate() {
            insert_exercise(
                &mut *conn,
                ExerciseTable::Client,
                &client_session_id,
                order,
                exercise,
            )
            .await?;
        }
        exercises_copied += exercises.len();
    }

    tracing::debug!(
        client_program_id = %client_program_id,
        sessions = sessions.len(),
        exercises = exercises_copied,
        "Template sessions copied"
    );
    Ok((sessions.len(), exercises_copied))
}
