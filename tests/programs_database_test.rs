// ABOUTME: Integration tests for template program storage
// ABOUTME: Tests creation, full-tree save and load, catalog resolution, listing, and deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests per CLAUDE.md guidelines)
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use common::{count_rows, create_template, create_template_with_exercises, TEST_COACH};
use chrono::NaiveDate;
use virtus_server::{
    builder::{ExerciseField, ProgramEditor},
    context::ActorContext,
    database::CreateProgramRequest,
    errors::ErrorCode,
    models::CatalogExercise,
    services::assign_program_to_client,
};

#[tokio::test]
async fn test_create_template_fills_every_week() {
    let database = common::create_test_database().await.unwrap();

    let program = create_template(&database, TEST_COACH, "Force 4 semaines", 4)
        .await
        .unwrap();

    assert_eq!(program.name, "Force 4 semaines");
    assert_eq!(program.week_count, 4);
    assert_eq!(program.coach_id, TEST_COACH);
    for week in 1..=4 {
        let sessions = program.sessions(week);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].name, "Séance 1");
    }
    assert!(program.customized_weeks.is_empty());
    assert_eq!(count_rows(&database, "template_sessions").await, 4);
}

#[tokio::test]
async fn test_create_rejects_invalid_requests() {
    let database = common::create_test_database().await.unwrap();
    let programs = database.programs();

    let blank = CreateProgramRequest {
        name: "   ".into(),
        objective: String::new(),
        week_count: None,
        client_id: None,
    };
    let err = programs.create(TEST_COACH, &blank).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);

    let too_long = CreateProgramRequest {
        name: "Année complète".into(),
        objective: String::new(),
        week_count: Some(53),
        client_id: None,
    };
    let err = programs.create(TEST_COACH, &too_long).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);

    assert!(programs.list_for_coach(TEST_COACH).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_and_load_round_trip() {
    let database = common::create_test_database().await.unwrap();
    let program = create_template(&database, TEST_COACH, "Hypertrophie", 3)
        .await
        .unwrap();

    let mut editor = ProgramEditor::from_program(program);
    editor.set_objective("Prise de masse");
    let exercise_id = editor.add_exercise(1).unwrap().unwrap();
    editor
        .update_exercise_field(1, exercise_id, ExerciseField::Name, "Développé couché", None)
        .unwrap();
    editor
        .update_exercise_field(1, exercise_id, ExerciseField::Sets, "4", None)
        .unwrap();
    editor
        .update_exercise_field(1, exercise_id, ExerciseField::LoadValue, "80", None)
        .unwrap();
    editor
        .update_exercise_field(1, exercise_id, ExerciseField::Intensification, "Rest-pause", None)
        .unwrap();
    editor
        .update_exercise_field(1, exercise_id, ExerciseField::Notes, "Coudes serrés", None)
        .unwrap();

    // Week 3 diverges from the template
    editor.select_week(3).unwrap();
    editor
        .update_exercise_field(1, exercise_id, ExerciseField::Reps, "6", Some(0))
        .unwrap();
    editor.add_session();

    let program = editor.into_program();
    database
        .programs()
        .save_structure(TEST_COACH, &program)
        .await
        .unwrap();

    let loaded = database
        .programs()
        .load(&program.id, TEST_COACH)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(loaded, program);
    assert_eq!(loaded.customized_weeks.iter().copied().collect::<Vec<_>>(), vec![3]);
    assert_eq!(loaded.sessions(3)[0].exercises[0].details[0].reps, "6");
    assert_eq!(loaded.sessions(2)[0].exercises[0].details[0].reps, "12");
}

#[tokio::test]
async fn test_save_replaces_previous_tree() {
    let database = common::create_test_database().await.unwrap();
    let program = create_template_with_exercises(&database, TEST_COACH, 2, &["Squat", "Fentes"])
        .await
        .unwrap();
    assert_eq!(count_rows(&database, "template_session_exercises").await, 4);

    let mut editor = ProgramEditor::from_program(program);
    let first = editor.program().sessions(1)[0].exercises[0].id;
    editor.remove_exercise(1, first).unwrap();
    let program = editor.into_program();

    database
        .programs()
        .save_structure(TEST_COACH, &program)
        .await
        .unwrap();

    assert_eq!(count_rows(&database, "template_session_exercises").await, 2);
    let loaded = database
        .programs()
        .load(&program.id, TEST_COACH)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.sessions(2)[0].exercises[0].name, "Fentes");
}

#[tokio::test]
async fn test_save_repairs_missing_and_extra_weeks() {
    let database = common::create_test_database().await.unwrap();
    let mut program = create_template_with_exercises(&database, TEST_COACH, 2, &["Squat"])
        .await
        .unwrap();

    // Week 2 missing and a stray week 7 beyond week_count
    let template_week = program.sessions(1).to_vec();
    program.sessions_by_week.remove(&2);
    program.sessions_by_week.insert(7, template_week.clone());
    program.customized_weeks.insert(7);

    database
        .programs()
        .save_structure(TEST_COACH, &program)
        .await
        .unwrap();
    assert_eq!(count_rows(&database, "template_sessions").await, 2);

    let loaded = database
        .programs()
        .load(&program.id, TEST_COACH)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.week_count, 2);
    assert_eq!(
        loaded.sessions_by_week.keys().copied().collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(loaded.sessions(2), template_week.as_slice());
    assert!(loaded.customized_weeks.is_empty());

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let result = assign_program_to_client(
        &database,
        &ActorContext::new(TEST_COACH),
        &program.id,
        "client-1",
        start,
    )
    .await
    .unwrap();
    assert_eq!(result.sessions_copied, 2);
    assert_eq!(result.exercises_copied, 2);
}

#[tokio::test]
async fn test_save_structure_for_other_coach_is_not_found() {
    let database = common::create_test_database().await.unwrap();
    let program = create_template(&database, TEST_COACH, "Mobilité", 1)
        .await
        .unwrap();

    let err = database
        .programs()
        .save_structure("coach-2", &program)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(count_rows(&database, "template_sessions").await, 1);
}

#[tokio::test]
async fn test_load_resolves_catalog_names() {
    let database = common::create_test_database().await.unwrap();
    let catalog = database.catalog();
    let mut squat = CatalogExercise {
        id: "cat-squat".into(),
        name: "Squat".into(),
        category: Some("musculation".into()),
        muscle_group: None,
        equipment: Some("barre".into()),
        illustration_url: Some("https://img.example/squat.png".into()),
        video_url: None,
    };
    catalog.upsert(&squat).await.unwrap();

    let program = create_template(&database, TEST_COACH, "Jambes", 1)
        .await
        .unwrap();
    let mut editor = ProgramEditor::from_program(program);
    editor.drop_catalog_exercise(1, &squat).unwrap();
    let program = editor.into_program();
    database
        .programs()
        .save_structure(TEST_COACH, &program)
        .await
        .unwrap();

    // Renaming the catalog entry shows up on the next load
    squat.name = "Back squat".into();
    squat.illustration_url = Some("https://img.example/back-squat.png".into());
    catalog.upsert(&squat).await.unwrap();

    let loaded = database
        .programs()
        .load(&program.id, TEST_COACH)
        .await
        .unwrap()
        .unwrap();
    let exercise = &loaded.sessions(1)[0].exercises[0];
    assert_eq!(exercise.name, "Back squat");
    assert_eq!(exercise.illustration_url, "https://img.example/back-squat.png");
}

#[tokio::test]
async fn test_list_update_and_delete() {
    let database = common::create_test_database().await.unwrap();
    let programs = database.programs();

    let first = create_template(&database, TEST_COACH, "Programme A", 1)
        .await
        .unwrap();
    create_template(&database, TEST_COACH, "Programme B", 2)
        .await
        .unwrap();
    create_template(&database, "coach-2", "Programme C", 1)
        .await
        .unwrap();

    let listed = programs.list_for_coach(TEST_COACH).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|p| p.coach_id == TEST_COACH));

    assert!(programs
        .update_details(&first.id, TEST_COACH, "Programme A+", "Force")
        .await
        .unwrap());
    let record = programs.get(&first.id, TEST_COACH).await.unwrap().unwrap();
    assert_eq!(record.name, "Programme A+");
    assert_eq!(record.objective, "Force");

    // Other coaches cannot see or delete it
    assert!(programs.get(&first.id, "coach-2").await.unwrap().is_none());
    assert!(!programs.delete(&first.id, "coach-2").await.unwrap());

    assert!(programs.delete(&first.id, TEST_COACH).await.unwrap());
    assert!(programs.load(&first.id, TEST_COACH).await.unwrap().is_none());
    assert_eq!(programs.list_for_coach(TEST_COACH).await.unwrap().len(), 1);
    // Sessions of the deleted template cascade away (B has 2, C has 1)
    assert_eq!(count_rows(&database, "template_sessions").await, 3);
}
