// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory database setup and sample template program builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `virtus_server`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use std::sync::Once;
use virtus_server::{
    builder::{ExerciseField, ProgramEditor},
    database::{CreateProgramRequest, Database},
    models::WorkoutProgram,
};

static INIT_LOGGER: Once = Once::new();

/// Coach used by most tests
pub const TEST_COACH: &str = "coach-1";

/// Client used by most tests
pub const TEST_CLIENT: &str = "client-1";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    Ok(database)
}

/// Create an empty template owned by `coach_id`
pub async fn create_template(
    database: &Database,
    coach_id: &str,
    name: &str,
    week_count: u32,
) -> Result<WorkoutProgram> {
    let request = CreateProgramRequest {
        name: name.to_owned(),
        objective: "Force".to_owned(),
        week_count: Some(week_count),
        client_id: None,
    };
    let template = database.programs().create(coach_id, &request).await?;
    let program = database
        .programs()
        .load(&template.id, coach_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("created template not found"))?;
    Ok(program)
}

/// Create a template whose first session holds the named exercises in every week
pub async fn create_template_with_exercises(
    database: &Database,
    coach_id: &str,
    week_count: u32,
    exercise_names: &[&str],
) -> Result<WorkoutProgram> {
    let program = create_template(database, coach_id, "Hypertrophie", week_count).await?;
    let mut editor = ProgramEditor::from_program(program);
    let session_id = editor.active_session_id().unwrap();

    for name in exercise_names {
        let exercise_id = editor.add_exercise(session_id)?.unwrap();
        editor.update_exercise_field(session_id, exercise_id, ExerciseField::Name, name, None)?;
        editor.update_exercise_field(session_id, exercise_id, ExerciseField::Sets, "3", None)?;
        editor.update_exercise_field(session_id, exercise_id, ExerciseField::Reps, "10", None)?;
    }

    let program = editor.into_program();
    database.programs().save_structure(coach_id, &program).await?;
    Ok(program)
}

/// Count rows of a table
pub async fn count_rows(database: &Database, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(database.pool())
        .await
        .unwrap()
}
