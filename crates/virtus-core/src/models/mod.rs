// ABOUTME: Domain models shared across the Virtus workspace
// ABOUTME: Re-exports program, assignment, and exercise catalog types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

mod assignment;
mod catalog;
mod program;

pub use assignment::{
    AssignProgramResult, AssignmentStatus, AssignmentSummary, ClientSessionStatus,
    ProgramAssignment,
};
pub use catalog::{CatalogExercise, ExerciseInfo};
pub use program::{
    Alternative, Intensification, Load, LoadUnit, SetDetail, WorkoutExercise, WorkoutProgram,
    WorkoutSession,
};
