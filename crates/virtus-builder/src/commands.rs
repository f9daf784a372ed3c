// ABOUTME: Serializable edit commands so clients can drive the editor remotely
// ABOUTME: EditCommand is a serde-tagged enum applied to a ProgramEditor in one call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::drag::DragPayload;
use crate::editor::ProgramEditor;
use crate::fields::ExerciseField;
use serde::{Deserialize, Serialize};
use virtus_core::errors::{AppError, AppResult};
use virtus_core::models::CatalogExercise;

/// One editing operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditCommand {
    /// Rename the program
    SetName {
        /// New name
        name: String,
    },
    /// Change the objective
    SetObjective {
        /// New objective
        objective: String,
    },
    /// Change the target client
    SetClient {
        /// Client id, or none
        client_id: Option<String>,
    },
    /// Resize the program
    SetWeekCount {
        /// Requested week count (clamped)
        week_count: i64,
    },
    /// Show another week
    SelectWeek {
        /// Week number
        week: u32,
    },
    /// Target another session
    SelectSession {
        /// Session id
        session_id: u32,
    },
    /// Edit one exercise field in the selected week
    UpdateExercise {
        /// Session id
        session_id: u32,
        /// Exercise id
        exercise_id: u32,
        /// Field to change
        field: ExerciseField,
        /// New value as typed
        value: String,
        /// Restrict a set parameter edit to one set
        #[serde(default)]
        set_index: Option<usize>,
    },
    /// Resolve an exercise against the catalog
    LinkCatalogExercise {
        /// Session id
        session_id: u32,
        /// Exercise id
        exercise_id: u32,
        /// Catalog entry
        exercise: CatalogExercise,
    },
    /// Add an empty session to every week
    AddSession,
    /// Remove a session from every week
    RemoveSession {
        /// Session id
        session_id: u32,
    },
    /// Rename a session in every week
    RenameSession {
        /// Session id
        session_id: u32,
        /// New name
        name: String,
    },
    /// Reorder a session in every week
    MoveSession {
        /// Session id
        session_id: u32,
        /// Target position
        to_index: usize,
    },
    /// Copy a session in every week
    DuplicateSession {
        /// Session id
        session_id: u32,
    },
    /// Add a blank exercise in the selected week
    AddExercise {
        /// Session id
        session_id: u32,
    },
    /// Drop a raw drag payload onto a session in the selected week
    Drop {
        /// Session id
        session_id: u32,
        /// Text carried by the drop event
        payload: String,
    },
    /// Remove an exercise in the selected week
    RemoveExercise {
        /// Session id
        session_id: u32,
        /// Exercise id
        exercise_id: u32,
    },
    /// Reorder an exercise in every week
    MoveExercise {
        /// Session id
        session_id: u32,
        /// Exercise id
        exercise_id: u32,
        /// Target position
        to_index: usize,
    },
    /// Make a customized week mirror week 1 again
    ResetWeek {
        /// Week number
        week: u32,
    },
}

impl ProgramEditor {
    /// Apply a command
    ///
    /// # Errors
    ///
    /// Returns an error for invalid weeks, blank names, or drop payloads that
    /// are not exercises
    pub fn apply(&mut self, command: EditCommand) -> AppResult<()> {
        match command {
            EditCommand::SetName { name } => self.set_name(&name)?,
            EditCommand::SetObjective { objective } => self.set_objective(&objective),
            EditCommand::SetClient { client_id } => self.set_client(client_id),
            EditCommand::SetWeekCount { week_count } => {
                self.set_week_count(week_count);
            }
            EditCommand::SelectWeek { week } => self.select_week(week)?,
            EditCommand::SelectSession { session_id } => {
                self.select_session(session_id);
            }
            EditCommand::UpdateExercise {
                session_id,
                exercise_id,
                field,
                value,
                set_index,
            } => self.update_exercise_field(session_id, exercise_id, field, &value, set_index)?,
            EditCommand::LinkCatalogExercise {
                session_id,
                exercise_id,
                exercise,
            } => self.link_catalog_exercise(session_id, exercise_id, &exercise)?,
            EditCommand::AddSession => {
                self.add_session();
            }
            EditCommand::RemoveSession { session_id } => self.remove_session(session_id),
            EditCommand::RenameSession { session_id, name } => {
                self.rename_session(session_id, &name);
            }
            EditCommand::MoveSession {
                session_id,
                to_index,
            } => self.move_session(session_id, to_index),
            EditCommand::DuplicateSession { session_id } => {
                self.duplicate_session(session_id);
            }
            EditCommand::AddExercise { session_id } => {
                self.add_exercise(session_id)?;
            }
            EditCommand::Drop {
                session_id,
                payload,
            } => {
                let payload = DragPayload::parse(&payload)?;
                let exercise = payload.as_exercise().ok_or_else(|| {
                    AppError::invalid_input("Only exercises can be dropped on a workout session")
                })?;
                self.drop_catalog_exercise(session_id, exercise)?;
            }
            EditCommand::RemoveExercise {
                session_id,
                exercise_id,
            } => self.remove_exercise(session_id, exercise_id)?,
            EditCommand::MoveExercise {
                session_id,
                exercise_id,
                to_index,
            } => self.move_exercise(session_id, exercise_id, to_index),
            EditCommand::ResetWeek { week } => self.reset_week_to_template(week)?,
        }
        Ok(())
    }

    /// Apply several commands in order, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns the first command error; earlier commands stay applied
    pub fn apply_all(&mut self, commands: impl IntoIterator<Item = EditCommand>) -> AppResult<()> {
        commands.into_iter().try_for_each(|command| self.apply(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_deserialize_from_tagged_json() {
        let command: EditCommand = serde_json::from_str(
            r#"{"type":"update_exercise","session_id":1,"exercise_id":2,"field":"load.value","value":"80"}"#,
        )
        .unwrap();
        assert_eq!(
            command,
            EditCommand::UpdateExercise {
                session_id: 1,
                exercise_id: 2,
                field: ExerciseField::LoadValue,
                value: "80".into(),
                set_index: None,
            }
        );

        let command: EditCommand = serde_json::from_str(r#"{"type":"add_session"}"#).unwrap();
        assert_eq!(command, EditCommand::AddSession);
    }

    #[test]
    fn test_dropping_food_on_a_workout_fails() {
        let mut editor = ProgramEditor::new("draft", "coach");
        let result = editor.apply(EditCommand::Drop {
            session_id: 1,
            payload: r#"{"type":"food","data":{}}"#.into(),
        });
        assert!(result.is_err());
    }
}
