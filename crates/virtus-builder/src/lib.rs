// ABOUTME: Template workout program editor for the Virtus coaching platform
// ABOUTME: Pure in-memory editing with week-1-as-template propagation and serializable commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Virtus Builder
//!
//! Editing logic for template workout programs. Week 1 acts as the template:
//! edits made there are copied into every later week that the coach has not
//! customized. Nothing here touches storage; callers persist the resulting
//! [`virtus_core::models::WorkoutProgram`] themselves.

/// Serializable edit commands
pub mod commands;
/// Per-set detail helpers
pub mod details;
/// Drag-and-drop payload decoding
pub mod drag;
/// The program editor and propagation rule
pub mod editor;
/// Exercise field edits
pub mod fields;
mod structure;

pub use commands::EditCommand;
pub use drag::DragPayload;
pub use editor::{EditorSnapshot, ProgramEditor};
pub use fields::ExerciseField;
