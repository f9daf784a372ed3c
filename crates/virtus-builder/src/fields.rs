// ABOUTME: Exercise field edits: which field changed and how the new value is applied
// ABOUTME: Handles catalog unlinking, set count resizing, intensification, and per-set edits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::details::{ensure_details, parse_sets, resize_details};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use virtus_core::constants::intensification::NONE_SENTINEL;
use virtus_core::errors::AppError;
use virtus_core::models::{Intensification, LoadUnit, SetDetail, WorkoutExercise};

/// An editable field of a workout exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseField {
    /// Free-text name; unlinks the catalog reference
    #[serde(rename = "name")]
    Name,
    /// Catalog reference
    #[serde(rename = "exerciseId")]
    ExerciseId,
    /// Illustration URL
    #[serde(rename = "illustrationUrl")]
    IllustrationUrl,
    /// Typed number of sets
    #[serde(rename = "sets")]
    Sets,
    /// Per-set editing toggle
    #[serde(rename = "isDetailed")]
    IsDetailed,
    /// Intensification technique
    #[serde(rename = "intensification")]
    Intensification,
    /// Repetitions
    #[serde(rename = "reps")]
    Reps,
    /// Load value
    #[serde(rename = "load.value")]
    LoadValue,
    /// Load unit
    #[serde(rename = "load.unit")]
    LoadUnit,
    /// Tempo
    #[serde(rename = "tempo")]
    Tempo,
    /// Rest
    #[serde(rename = "rest")]
    Rest,
    /// Coach notes
    #[serde(rename = "notes")]
    Notes,
}

impl ExerciseField {
    /// Wire name of the field
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ExerciseId => "exerciseId",
            Self::IllustrationUrl => "illustrationUrl",
            Self::Sets => "sets",
            Self::IsDetailed => "isDetailed",
            Self::Intensification => "intensification",
            Self::Reps => "reps",
            Self::LoadValue => "load.value",
            Self::LoadUnit => "load.unit",
            Self::Tempo => "tempo",
            Self::Rest => "rest",
            Self::Notes => "notes",
        }
    }
}

impl fmt::Display for ExerciseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "exerciseId" => Ok(Self::ExerciseId),
            "illustrationUrl" => Ok(Self::IllustrationUrl),
            "sets" => Ok(Self::Sets),
            "isDetailed" => Ok(Self::IsDetailed),
            "intensification" => Ok(Self::Intensification),
            "reps" => Ok(Self::Reps),
            "load.value" => Ok(Self::LoadValue),
            "load.unit" => Ok(Self::LoadUnit),
            "tempo" => Ok(Self::Tempo),
            "rest" => Ok(Self::Rest),
            "notes" => Ok(Self::Notes),
            other => Err(AppError::invalid_input(format!(
                "Unknown exercise field: {other}"
            ))),
        }
    }
}

/// Apply a field edit to one exercise
///
/// `set_index` only matters for set parameters: when given, only that detail
/// changes (an out-of-range index changes nothing); otherwise every detail does.
pub fn apply_field(
    exercise: &mut WorkoutExercise,
    field: ExerciseField,
    value: &str,
    set_index: Option<usize>,
) {
    match field {
        ExerciseField::Name => {
            value.clone_into(&mut exercise.name);
            exercise.exercise_id.clear();
        }
        ExerciseField::ExerciseId => value.clone_into(&mut exercise.exercise_id),
        ExerciseField::IllustrationUrl => value.clone_into(&mut exercise.illustration_url),
        ExerciseField::Sets => {
            ensure_details(&mut exercise.details);
            resize_details(&mut exercise.details, parse_sets(value));
            value.clone_into(&mut exercise.sets);
        }
        ExerciseField::IsDetailed => {
            exercise.is_detailed = matches!(value.trim(), "true" | "1");
        }
        ExerciseField::Intensification => {
            exercise.intensification = if value == NONE_SENTINEL {
                Vec::new()
            } else {
                vec![Intensification {
                    id: 1,
                    value: value.to_owned(),
                }]
            };
        }
        ExerciseField::Notes => {
            exercise.notes = (!value.is_empty()).then(|| value.to_owned());
        }
        ExerciseField::Reps
        | ExerciseField::LoadValue
        | ExerciseField::LoadUnit
        | ExerciseField::Tempo
        | ExerciseField::Rest => {
            ensure_details(&mut exercise.details);
            match set_index {
                Some(index) => {
                    if let Some(detail) = exercise.details.get_mut(index) {
                        apply_set_parameter(detail, field, value);
                    }
                }
                None => {
                    for detail in &mut exercise.details {
                        apply_set_parameter(detail, field, value);
                    }
                }
            }
        }
    }
}

fn apply_set_parameter(detail: &mut SetDetail, field: ExerciseField, value: &str) {
    match field {
        ExerciseField::Reps => value.clone_into(&mut detail.reps),
        ExerciseField::LoadValue => value.clone_into(&mut detail.load.value),
        ExerciseField::LoadUnit => detail.load.unit = LoadUnit::parse(value),
        ExerciseField::Tempo => value.clone_into(&mut detail.tempo),
        ExerciseField::Rest => value.clone_into(&mut detail.rest),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use virtus_core::constants::program::MAX_SETS;

    fn linked_exercise() -> WorkoutExercise {
        WorkoutExercise {
            exercise_id: "cat-squat".into(),
            name: "Squat".into(),
            ..WorkoutExercise::blank(7)
        }
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!("load.value".parse::<ExerciseField>().unwrap(), ExerciseField::LoadValue);
        assert_eq!(ExerciseField::LoadUnit.to_string(), "load.unit");
        assert!("weight".parse::<ExerciseField>().is_err());
    }

    #[test]
    fn test_renaming_unlinks_catalog_reference() {
        let mut exercise = linked_exercise();
        apply_field(&mut exercise, ExerciseField::Name, "Front squat", None);
        assert_eq!(exercise.name, "Front squat");
        assert!(exercise.exercise_id.is_empty());
    }

    #[test]
    fn test_sets_keeps_raw_text_and_resizes() {
        let mut exercise = linked_exercise();
        apply_field(&mut exercise, ExerciseField::Sets, "5", None);
        assert_eq!(exercise.sets, "5");
        assert_eq!(exercise.details.len(), 5);

        apply_field(&mut exercise, ExerciseField::Sets, "", None);
        assert_eq!(exercise.sets, "");
        assert!(exercise.details.is_empty());
    }

    #[test]
    fn test_sets_clamps_oversized_count() {
        let mut exercise = WorkoutExercise::blank(1);
        apply_field(&mut exercise, ExerciseField::Sets, "100000000000000000", None);
        assert_eq!(exercise.sets, "100000000000000000");
        assert_eq!(exercise.details.len(), MAX_SETS);
    }

    #[test]
    fn test_intensification_sentinel_clears() {
        let mut exercise = linked_exercise();
        apply_field(&mut exercise, ExerciseField::Intensification, "Drop set", None);
        assert_eq!(exercise.intensification.len(), 1);
        assert_eq!(exercise.intensification[0].value, "Drop set");

        apply_field(&mut exercise, ExerciseField::Intensification, "Aucune", None);
        assert!(exercise.intensification.is_empty());

        apply_field(&mut exercise, ExerciseField::Intensification, "", None);
        assert_eq!(exercise.intensification.len(), 1);
        assert_eq!(exercise.intensification[0].value, "");
    }

    #[test]
    fn test_set_parameter_targets_single_or_all_sets() {
        let mut exercise = linked_exercise();
        apply_field(&mut exercise, ExerciseField::Reps, "8", Some(1));
        assert_eq!(exercise.details[0].reps, "12");
        assert_eq!(exercise.details[1].reps, "8");

        apply_field(&mut exercise, ExerciseField::LoadUnit, "RPE", None);
        assert!(exercise.details.iter().all(|d| d.load.unit == LoadUnit::Rpe));

        let before = exercise.details.clone();
        apply_field(&mut exercise, ExerciseField::Tempo, "4010", Some(9));
        assert_eq!(exercise.details, before);
    }

    #[test]
    fn test_set_parameter_seeds_empty_details() {
        let mut exercise = linked_exercise();
        exercise.details.clear();
        apply_field(&mut exercise, ExerciseField::Rest, "90s", None);
        assert_eq!(exercise.details.len(), 1);
        assert_eq!(exercise.details[0].rest, "90s");
    }
}
