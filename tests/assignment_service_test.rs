// ABOUTME: Integration tests for assigning a template program to a client
// ABOUTME: Tests the copied rows, transactional rollback, duplicate rejection, and copy independence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests per CLAUDE.md guidelines)
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use chrono::NaiveDate;
use common::{count_rows, create_template, create_template_with_exercises, TEST_CLIENT, TEST_COACH};
use virtus_server::{
    builder::{ExerciseField, ProgramEditor},
    context::ActorContext,
    errors::ErrorCode,
    models::{AssignmentStatus, ClientSessionStatus},
    services::assign_program_to_client,
};

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

#[tokio::test]
async fn test_assign_copies_sessions_and_exercises_in_order() {
    let database = common::create_test_database().await.unwrap();
    let template =
        create_template_with_exercises(&database, TEST_COACH, 1, &["Squat", "Soulevé de terre"])
            .await
            .unwrap();
    let actor = ActorContext::new(TEST_COACH);

    let result = assign_program_to_client(&database, &actor, &template.id, TEST_CLIENT, start_date())
        .await
        .unwrap();

    assert_eq!(result.sessions_copied, 1);
    assert_eq!(result.exercises_copied, 2);
    assert_eq!(count_rows(&database, "client_programs").await, 1);
    assert_eq!(count_rows(&database, "client_sessions").await, 1);
    assert_eq!(count_rows(&database, "client_session_exercises").await, 2);

    let orders: Vec<i64> = sqlx::query_scalar(
        "SELECT exercise_order FROM client_session_exercises ORDER BY exercise_order",
    )
    .fetch_all(database.pool())
    .await
    .unwrap();
    assert_eq!(orders, vec![0, 1]);

    let copy = database
        .client_programs()
        .get_program(&result.client_program_id)
        .await
        .unwrap()
        .unwrap();
    let names: Vec<&str> = copy.sessions(1)[0]
        .exercises
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["Squat", "Soulevé de terre"]);
    assert_eq!(copy.sessions(1)[0].exercises[0].details.len(), 3);
    assert_eq!(copy.client_id.as_deref(), Some(TEST_CLIENT));

    let sessions = database
        .client_programs()
        .list_sessions(&result.client_program_id)
        .await
        .unwrap();
    assert!(sessions
        .iter()
        .all(|s| s.status == ClientSessionStatus::Pending));
}

#[tokio::test]
async fn test_assignment_record_starts_at_first_session() {
    let database = common::create_test_database().await.unwrap();
    let template = create_template_with_exercises(&database, TEST_COACH, 3, &["Tractions"])
        .await
        .unwrap();
    let actor = ActorContext::new(TEST_COACH);

    let result = assign_program_to_client(&database, &actor, &template.id, TEST_CLIENT, start_date())
        .await
        .unwrap();
    assert_eq!(result.sessions_copied, 3);
    assert_eq!(result.exercises_copied, 3);

    let assignment = database
        .assignments()
        .get(&result.assignment_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assignment.program_template_id, template.id);
    assert_eq!(assignment.client_program_id, result.client_program_id);
    assert_eq!(assignment.client_id, TEST_CLIENT);
    assert_eq!(assignment.coach_id, TEST_COACH);
    assert_eq!(assignment.start_date, start_date());
    assert_eq!(assignment.status, AssignmentStatus::Active);
    assert_eq!(assignment.current_week, 1);
    assert_eq!(assignment.current_session_order, 1);

    let record = database
        .client_programs()
        .get(&result.client_program_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.template_id.as_deref(), Some(template.id.as_str()));
    assert_eq!(record.source_type, "coach_assigned");
    assert_eq!(record.week_count, 3);
    assert_eq!(record.name, template.name);
}

#[tokio::test]
async fn test_failed_assignment_leaves_no_partial_copy() {
    let database = common::create_test_database().await.unwrap();
    let template = create_template_with_exercises(&database, TEST_COACH, 2, &["Dips", "Pompes"])
        .await
        .unwrap();

    // Fail the last write of the transaction
    sqlx::query(
        r"
        CREATE TRIGGER fail_assignment BEFORE INSERT ON program_assignments
        BEGIN
            SELECT RAISE(ABORT, 'assignment insert rejected');
        END
        ",
    )
    .execute(database.pool())
    .await
    .unwrap();

    let actor = ActorContext::new(TEST_COACH);
    let err = assign_program_to_client(&database, &actor, &template.id, TEST_CLIENT, start_date())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);

    assert_eq!(count_rows(&database, "client_programs").await, 0);
    assert_eq!(count_rows(&database, "client_sessions").await, 0);
    assert_eq!(count_rows(&database, "client_session_exercises").await, 0);
    assert_eq!(count_rows(&database, "program_assignments").await, 0);
}

#[tokio::test]
async fn test_duplicate_open_assignment_is_rejected() {
    let database = common::create_test_database().await.unwrap();
    let template = create_template(&database, TEST_COACH, "Cardio", 2)
        .await
        .unwrap();
    let actor = ActorContext::new(TEST_COACH);

    let first = assign_program_to_client(&database, &actor, &template.id, TEST_CLIENT, start_date())
        .await
        .unwrap();

    let err = assign_program_to_client(&database, &actor, &template.id, TEST_CLIENT, start_date())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(count_rows(&database, "client_programs").await, 1);

    // Another client can still receive it
    assign_program_to_client(&database, &actor, &template.id, "client-2", start_date())
        .await
        .unwrap();

    // Once the first assignment is finished the client can get it again
    database
        .assignments()
        .update_status(&first.assignment_id, AssignmentStatus::Completed)
        .await
        .unwrap();
    assign_program_to_client(&database, &actor, &template.id, TEST_CLIENT, start_date())
        .await
        .unwrap();
    assert_eq!(count_rows(&database, "client_programs").await, 3);
}

#[tokio::test]
async fn test_unknown_or_foreign_template_is_not_found() {
    let database = common::create_test_database().await.unwrap();
    let template = create_template(&database, TEST_COACH, "Gainage", 1)
        .await
        .unwrap();

    let err = assign_program_to_client(
        &database,
        &ActorContext::new(TEST_COACH),
        "missing-template",
        TEST_CLIENT,
        start_date(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(err.resource_id.as_deref(), Some("missing-template"));

    let err = assign_program_to_client(
        &database,
        &ActorContext::new("coach-2"),
        &template.id,
        TEST_CLIENT,
        start_date(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(count_rows(&database, "client_programs").await, 0);
}

#[tokio::test]
async fn test_blank_client_is_rejected() {
    let database = common::create_test_database().await.unwrap();
    let template = create_template(&database, TEST_COACH, "Gainage", 1)
        .await
        .unwrap();

    let err = assign_program_to_client(
        &database,
        &ActorContext::new(TEST_COACH),
        &template.id,
        "  ",
        start_date(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_template_edits_do_not_reach_the_copy() {
    let database = common::create_test_database().await.unwrap();
    let template = create_template_with_exercises(&database, TEST_COACH, 1, &["Rowing"])
        .await
        .unwrap();
    let actor = ActorContext::new(TEST_COACH);
    let result = assign_program_to_client(&database, &actor, &template.id, TEST_CLIENT, start_date())
        .await
        .unwrap();

    let mut editor = ProgramEditor::from_program(template.clone());
    let exercise_id = editor.program().sessions(1)[0].exercises[0].id;
    editor
        .update_exercise_field(1, exercise_id, ExerciseField::Name, "Rowing haltère", None)
        .unwrap();
    editor.add_exercise(1).unwrap();
    database
        .programs()
        .save_structure(TEST_COACH, &editor.into_program())
        .await
        .unwrap();

    let copy = database
        .client_programs()
        .get_program(&result.client_program_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(copy.sessions(1)[0].exercises.len(), 1);
    assert_eq!(copy.sessions(1)[0].exercises[0].name, "Rowing");

    // Deleting the template keeps the client copy
    assert!(database
        .programs()
        .delete(&template.id, TEST_COACH)
        .await
        .unwrap());
    assert!(database
        .client_programs()
        .get(&result.client_program_id)
        .await
        .unwrap()
        .is_some());
}
