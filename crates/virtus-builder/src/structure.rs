// ABOUTME: Structural editing: adding, removing, reordering, and duplicating sessions and exercises
// ABOUTME: Session changes apply to every week; exercise membership changes follow the template rule
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::editor::ProgramEditor;
use std::collections::HashMap;
use virtus_core::constants::program::SESSION_NAME_PREFIX;
use virtus_core::errors::AppResult;
use virtus_core::models::{CatalogExercise, WorkoutExercise, WorkoutSession};

fn move_within<T>(items: &mut Vec<T>, from: usize, to_index: usize) {
    let item = items.remove(from);
    let to = to_index.min(items.len());
    items.insert(to, item);
}

impl ProgramEditor {
    /// Next free exercise id across every week
    #[must_use]
    pub fn next_exercise_id(&self) -> u32 {
        self.program.max_exercise_id() + 1
    }

    /// Next free session id across every week
    #[must_use]
    pub fn next_session_id(&self) -> u32 {
        self.program.max_session_id() + 1
    }

    /// Append an empty session to every week and make it active
    pub fn add_session(&mut self) -> u32 {
        let id = self.next_session_id();
        let position = self.current_sessions().len() + 1;
        let name = format!("{SESSION_NAME_PREFIX} {position}");

        self.update_all_weeks(|sessions| {
            sessions.push(WorkoutSession {
                id,
                name: name.clone(),
                exercises: Vec::new(),
            });
        });
        self.active_session_id = Some(id);
        id
    }

    /// Remove a session from every week
    pub fn remove_session(&mut self, session_id: u32) {
        self.update_all_weeks(|sessions| sessions.retain(|session| session.id != session_id));
    }

    /// Rename a session in every week
    pub fn rename_session(&mut self, session_id: u32, name: &str) {
        self.update_all_weeks(|sessions| {
            for session in sessions.iter_mut().filter(|s| s.id == session_id) {
                name.clone_into(&mut session.name);
            }
        });
    }

    /// Move a session to a new position in every week
    pub fn move_session(&mut self, session_id: u32, to_index: usize) {
        self.update_all_weeks(|sessions| {
            if let Some(from) = sessions.iter().position(|s| s.id == session_id) {
                move_within(sessions, from, to_index);
            }
        });
    }

    /// Copy a session right after itself in every week
    ///
    /// The copy gets a fresh session id. Exercise ids are remapped once so
    /// that copies in different weeks still share identities.
    pub fn duplicate_session(&mut self, session_id: u32) -> Option<u32> {
        if !self.program.sessions_by_week.values().flatten().any(|s| s.id == session_id) {
            return None;
        }

        let new_session_id = self.next_session_id();
        let mut next_exercise_id = self.next_exercise_id();
        let mut remapped: HashMap<u32, u32> = HashMap::new();

        self.update_all_weeks(|sessions| {
            let Some(position) = sessions.iter().position(|s| s.id == session_id) else {
                return;
            };
            let mut copy = sessions[position].clone();
            copy.id = new_session_id;
            copy.name = format!("{} (copie)", copy.name);
            for exercise in &mut copy.exercises {
                exercise.id = *remapped.entry(exercise.id).or_insert_with(|| {
                    let id = next_exercise_id;
                    next_exercise_id += 1;
                    id
                });
            }
            sessions.insert(position + 1, copy);
        });
        Some(new_session_id)
    }

    /// Append a blank exercise to a session of the selected week
    ///
    /// # Errors
    ///
    /// Returns an error if the selected week is no longer valid
    pub fn add_exercise(&mut self, session_id: u32) -> AppResult<Option<u32>> {
        let exercise = WorkoutExercise::blank(self.next_exercise_id());
        self.push_exercise(session_id, exercise)
    }

    /// Append a catalog exercise dropped onto a session of the selected week
    ///
    /// # Errors
    ///
    /// Returns an error if the selected week is no longer valid
    pub fn drop_catalog_exercise(
        &mut self,
        session_id: u32,
        catalog: &CatalogExercise,
    ) -> AppResult<Option<u32>> {
        let exercise = WorkoutExercise {
            exercise_id: catalog.id.clone(),
            name: catalog.name.clone(),
            illustration_url: catalog.illustration_url.clone().unwrap_or_default(),
            ..WorkoutExercise::blank(self.next_exercise_id())
        };
        self.push_exercise(session_id, exercise)
    }

    /// Remove an exercise from a session of the selected week
    ///
    /// # Errors
    ///
    /// Returns an error if the selected week is no longer valid
    pub fn remove_exercise(&mut self, session_id: u32, exercise_id: u32) -> AppResult<()> {
        self.update_content(self.selected_week, |sessions| {
            for session in sessions.iter_mut().filter(|s| s.id == session_id) {
                session.exercises.retain(|exercise| exercise.id != exercise_id);
            }
        })
    }

    /// Reorder an exercise inside its session in every week
    pub fn move_exercise(&mut self, session_id: u32, exercise_id: u32, to_index: usize) {
        self.update_all_weeks(|sessions| {
            for session in sessions.iter_mut().filter(|s| s.id == session_id) {
                if let Some(from) = session.exercises.iter().position(|e| e.id == exercise_id) {
                    move_within(&mut session.exercises, from, to_index);
                }
            }
        });
    }

    fn push_exercise(
        &mut self,
        session_id: u32,
        exercise: WorkoutExercise,
    ) -> AppResult<Option<u32>> {
        if !self.current_sessions().iter().any(|s| s.id == session_id) {
            return Ok(None);
        }
        let id = exercise.id;
        self.update_content(self.selected_week, |sessions| {
            if let Some(session) = sessions.iter_mut().find(|s| s.id == session_id) {
                session.exercises.push(exercise);
            }
        })?;
        Ok(Some(id))
    }
}
