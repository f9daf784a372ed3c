// ABOUTME: Program editor owning a workout program and the week-1-as-template rule
// ABOUTME: Week 1 edits propagate to uncustomized weeks; direct edits to later weeks customize them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::fields::{apply_field, ExerciseField};
use serde::{Deserialize, Serialize};
use tracing::debug;
use virtus_core::constants::program::{MAX_WEEKS, MIN_WEEKS, TEMPLATE_WEEK};
use virtus_core::errors::{AppError, AppResult};
use virtus_core::models::{CatalogExercise, WorkoutProgram, WorkoutSession};

/// Editor state as persisted in drafts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    /// The program being edited
    pub program: WorkoutProgram,
    /// Week shown when the snapshot was taken
    pub selected_week: u32,
    /// Session targeted by exercise edits
    #[serde(default)]
    pub active_session_id: Option<u32>,
}

/// In-memory editor for a template workout program
///
/// Week 1 is the template: editing it rewrites every later week that has not
/// been customized. Editing a later week directly marks it customized, which
/// detaches it from further template propagation until it is reset.
#[derive(Debug, Clone)]
pub struct ProgramEditor {
    pub(crate) program: WorkoutProgram,
    pub(crate) selected_week: u32,
    pub(crate) active_session_id: Option<u32>,
}

impl ProgramEditor {
    /// Start editing a fresh one-week program
    #[must_use]
    pub fn new(id: impl Into<String>, coach_id: impl Into<String>) -> Self {
        Self::from_program(WorkoutProgram::new(id, coach_id))
    }

    /// Start editing an existing program, repairing any missing or extra weeks
    #[must_use]
    pub fn from_program(mut program: WorkoutProgram) -> Self {
        program.week_count = program.week_count.clamp(MIN_WEEKS, MAX_WEEKS);
        program.sessions_by_week.entry(TEMPLATE_WEEK).or_default();

        let mut editor = Self {
            program,
            selected_week: TEMPLATE_WEEK,
            active_session_id: None,
        };
        editor.fill_and_prune_weeks();
        editor.active_session_id = editor.first_session_id();
        editor
    }

    /// Restore an editor from a saved snapshot
    ///
    /// A selected week or active session that no longer exists falls back to
    /// week 1 and its first session.
    #[must_use]
    pub fn from_snapshot(snapshot: EditorSnapshot) -> Self {
        let mut editor = Self::from_program(snapshot.program);
        if editor.check_week(snapshot.selected_week).is_ok() {
            editor.selected_week = snapshot.selected_week;
        }
        editor.active_session_id = snapshot
            .active_session_id
            .filter(|id| editor.current_sessions().iter().any(|s| s.id == *id))
            .or_else(|| editor.first_session_id());
        editor
    }

    /// Capture the program together with the selection state
    #[must_use]
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            program: self.program.clone(),
            selected_week: self.selected_week,
            active_session_id: self.active_session_id,
        }
    }

    /// The program being edited
    #[must_use]
    pub const fn program(&self) -> &WorkoutProgram {
        &self.program
    }

    /// Consume the editor, returning the program
    #[must_use]
    pub fn into_program(self) -> WorkoutProgram {
        self.program
    }

    /// Week currently shown
    #[must_use]
    pub const fn selected_week(&self) -> u32 {
        self.selected_week
    }

    /// Session currently targeted by exercise edits
    #[must_use]
    pub const fn active_session_id(&self) -> Option<u32> {
        self.active_session_id
    }

    /// Sessions of the selected week
    #[must_use]
    pub fn current_sessions(&self) -> &[WorkoutSession] {
        self.program.sessions(self.selected_week)
    }

    /// Rename the program
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank
    pub fn set_name(&mut self, name: &str) -> AppResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("Program name cannot be empty"));
        }
        name.clone_into(&mut self.program.name);
        Ok(())
    }

    /// Change the training objective
    pub fn set_objective(&mut self, objective: &str) {
        objective.clone_into(&mut self.program.objective);
    }

    /// Change the client the program is prepared for
    pub fn set_client(&mut self, client_id: Option<String>) {
        self.program.client_id = client_id.filter(|id| !id.is_empty());
    }

    /// Show another week
    ///
    /// # Errors
    ///
    /// Returns an error if the week is outside `1..=week_count`
    pub fn select_week(&mut self, week: u32) -> AppResult<()> {
        self.check_week(week)?;
        self.selected_week = week;
        self.ensure_active_session();
        Ok(())
    }

    /// Target a session of the selected week; unknown ids leave the selection unchanged
    pub fn select_session(&mut self, session_id: u32) -> bool {
        let exists = self
            .current_sessions()
            .iter()
            .any(|session| session.id == session_id);
        if exists {
            self.active_session_id = Some(session_id);
        }
        exists
    }

    /// Resize the program, clamping to `1..=52`
    ///
    /// New weeks start as copies of week 1; weeks past the new count are
    /// dropped together with their customized flag.
    pub fn set_week_count(&mut self, requested: i64) -> u32 {
        let clamped = requested.clamp(i64::from(MIN_WEEKS), i64::from(MAX_WEEKS));
        let week_count = u32::try_from(clamped).unwrap_or(MIN_WEEKS);

        self.program.week_count = week_count;
        self.fill_and_prune_weeks();

        if self.selected_week > week_count {
            self.selected_week = week_count;
        }
        self.ensure_active_session();

        debug!(
            program_id = %self.program.id,
            requested,
            week_count,
            "Program week count updated"
        );
        week_count
    }

    /// Apply a content edit to one week
    ///
    /// Editing week 1 rewrites every uncustomized later week with a copy of
    /// the result. Editing any other week only touches that week and marks it
    /// customized, unless the edit left its content unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the week is outside `1..=week_count`
    pub fn update_content<F>(&mut self, week: u32, edit: F) -> AppResult<()>
    where
        F: FnOnce(&mut Vec<WorkoutSession>),
    {
        self.check_week(week)?;
        let sessions = self.program.sessions_by_week.entry(week).or_default();

        if week == TEMPLATE_WEEK {
            edit(sessions);
            self.propagate_template();
            return Ok(());
        }

        let before = sessions.clone();
        edit(&mut *sessions);
        if *sessions != before {
            self.program.customized_weeks.insert(week);
        }
        Ok(())
    }

    /// Apply a structural edit to every week independently
    ///
    /// The customized flags are left as they are.
    pub fn update_all_weeks<F>(&mut self, mut edit: F)
    where
        F: FnMut(&mut Vec<WorkoutSession>),
    {
        for sessions in self.program.sessions_by_week.values_mut() {
            edit(sessions);
        }
        self.ensure_active_session();
    }

    /// Edit one field of an exercise in the selected week
    ///
    /// Unknown session or exercise ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected week is no longer valid
    pub fn update_exercise_field(
        &mut self,
        session_id: u32,
        exercise_id: u32,
        field: ExerciseField,
        value: &str,
        set_index: Option<usize>,
    ) -> AppResult<()> {
        self.update_content(self.selected_week, |sessions| {
            if let Some(exercise) = sessions
                .iter_mut()
                .filter(|session| session.id == session_id)
                .flat_map(|session| session.exercises.iter_mut())
                .find(|exercise| exercise.id == exercise_id)
            {
                apply_field(exercise, field, value, set_index);
            }
        })
    }

    /// Point an exercise at a catalog entry, taking its name and illustration
    ///
    /// # Errors
    ///
    /// Returns an error if the selected week is no longer valid
    pub fn link_catalog_exercise(
        &mut self,
        session_id: u32,
        exercise_id: u32,
        catalog: &CatalogExercise,
    ) -> AppResult<()> {
        self.update_content(self.selected_week, |sessions| {
            if let Some(exercise) = sessions
                .iter_mut()
                .filter(|session| session.id == session_id)
                .flat_map(|session| session.exercises.iter_mut())
                .find(|exercise| exercise.id == exercise_id)
            {
                catalog.id.clone_into(&mut exercise.exercise_id);
                catalog.name.clone_into(&mut exercise.name);
                exercise.illustration_url = catalog.illustration_url.clone().unwrap_or_default();
            }
        })
    }

    /// Make a customized week mirror week 1 again
    ///
    /// # Errors
    ///
    /// Returns an error if the week is week 1 or outside `1..=week_count`
    pub fn reset_week_to_template(&mut self, week: u32) -> AppResult<()> {
        self.check_week(week)?;
        if week == TEMPLATE_WEEK {
            return Err(AppError::invalid_input(
                "Week 1 is the template and cannot be reset",
            ));
        }

        let template = self.template_sessions();
        self.program.sessions_by_week.insert(week, template);
        self.program.customized_weeks.remove(&week);
        self.ensure_active_session();

        debug!(program_id = %self.program.id, week, "Week reset to template");
        Ok(())
    }

    pub(crate) fn check_week(&self, week: u32) -> AppResult<()> {
        if (MIN_WEEKS..=self.program.week_count).contains(&week) {
            Ok(())
        } else {
            Err(AppError::invalid_input(format!(
                "Week {week} is outside 1..={}",
                self.program.week_count
            )))
        }
    }

    pub(crate) fn ensure_active_session(&mut self) {
        let still_present = self.active_session_id.is_some_and(|id| {
            self.current_sessions()
                .iter()
                .any(|session| session.id == id)
        });
        if !still_present {
            self.active_session_id = self.first_session_id();
        }
    }

    fn first_session_id(&self) -> Option<u32> {
        self.current_sessions().first().map(|session| session.id)
    }

    fn template_sessions(&self) -> Vec<WorkoutSession> {
        self.program.sessions(TEMPLATE_WEEK).to_vec()
    }

    fn propagate_template(&mut self) {
        let template = self.template_sessions();
        for week in (TEMPLATE_WEEK + 1)..=self.program.week_count {
            if self.program.follows_template(week) {
                self.program.sessions_by_week.insert(week, template.clone());
            }
        }
    }

    fn fill_and_prune_weeks(&mut self) {
        let week_count = self.program.week_count;
        let template = self.template_sessions();

        for week in MIN_WEEKS..=week_count {
            self.program
                .sessions_by_week
                .entry(week)
                .or_insert_with(|| template.clone());
        }
        self.program
            .sessions_by_week
            .retain(|week, _| (MIN_WEEKS..=week_count).contains(week));
        self.program
            .customized_weeks
            .retain(|week| *week > TEMPLATE_WEEK && *week <= week_count);
    }
}
