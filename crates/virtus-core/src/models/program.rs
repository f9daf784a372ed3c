// ABOUTME: Workout program models shared by the editor, the database layer, and drafts
// ABOUTME: WorkoutProgram, WorkoutSession, WorkoutExercise, SetDetail, and Load definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{program, set_defaults};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Unit attached to a load value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LoadUnit {
    /// Kilograms
    #[default]
    #[serde(rename = "kg")]
    Kg,
    /// Pounds
    #[serde(rename = "lbs")]
    Lbs,
    /// Percentage of one-repetition maximum
    #[serde(rename = "%")]
    Percent,
    /// Rate of perceived exertion
    #[serde(rename = "RPE")]
    Rpe,
    /// Speed (cardio machines)
    #[serde(rename = "km/h")]
    KmPerHour,
    /// Power output
    #[serde(rename = "W")]
    Watts,
    /// Machine level
    #[serde(rename = "lvl")]
    Level,
}

impl LoadUnit {
    /// Convert to the wire/database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lbs => "lbs",
            Self::Percent => "%",
            Self::Rpe => "RPE",
            Self::KmPerHour => "km/h",
            Self::Watts => "W",
            Self::Level => "lvl",
        }
    }

    /// Parse from string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "lbs" | "lb" => Self::Lbs,
            "%" => Self::Percent,
            "rpe" => Self::Rpe,
            "km/h" => Self::KmPerHour,
            "w" => Self::Watts,
            "lvl" => Self::Level,
            // Default to kilograms for unrecognized units
            _ => Self::Kg,
        }
    }
}

/// A load prescription: value plus unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Load {
    /// Free-form value as typed by the coach
    pub value: String,
    /// Unit of the value
    pub unit: LoadUnit,
}

/// Parameters for one set of an exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDetail {
    /// Repetitions
    pub reps: String,
    /// Load prescription
    pub load: Load,
    /// Tempo notation (eccentric/pause/concentric/pause)
    pub tempo: String,
    /// Rest after the set
    pub rest: String,
}

impl Default for SetDetail {
    fn default() -> Self {
        Self {
            reps: set_defaults::REPS.to_owned(),
            load: Load {
                value: set_defaults::LOAD_VALUE.to_owned(),
                unit: LoadUnit::Kg,
            },
            tempo: set_defaults::TEMPO.to_owned(),
            rest: set_defaults::REST.to_owned(),
        }
    }
}

/// Intensification technique applied to an exercise (drop set, rest-pause, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intensification {
    /// Local identifier
    pub id: u32,
    /// Technique name
    pub value: String,
}

/// Alternative exercise a client may substitute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    /// Catalog exercise id
    pub id: String,
    /// Display name
    pub name: String,
    /// Illustration URL
    #[serde(default)]
    pub illustration_url: String,
}

/// An exercise entry inside a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    /// Identifier, unique within a week and shared by the copies in other weeks
    pub id: u32,
    /// Catalog exercise reference; empty while unresolved
    #[serde(default)]
    pub exercise_id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Illustration URL
    #[serde(default)]
    pub illustration_url: String,
    /// Number of sets as typed by the coach
    #[serde(default)]
    pub sets: String,
    /// Whether per-set parameters are edited individually
    #[serde(default)]
    pub is_detailed: bool,
    /// Per-set parameters
    #[serde(default)]
    pub details: Vec<SetDetail>,
    /// Zero or one intensification technique
    #[serde(default)]
    pub intensification: Vec<Intensification>,
    /// Substitution options
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    /// Coach notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkoutExercise {
    /// Create an unlinked exercise with the default number of sets
    #[must_use]
    pub fn blank(id: u32) -> Self {
        Self {
            id,
            exercise_id: String::new(),
            name: String::new(),
            illustration_url: String::new(),
            sets: program::DEFAULT_NEW_EXERCISE_SETS.to_string(),
            is_detailed: false,
            details: vec![SetDetail::default(); program::DEFAULT_NEW_EXERCISE_SETS],
            intensification: Vec::new(),
            alternatives: Vec::new(),
            notes: None,
        }
    }
}

/// A training session: ordered exercises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Identifier, unique within the program and stable across weeks
    pub id: u32,
    /// Display name
    pub name: String,
    /// Ordered exercises
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
}

impl WorkoutSession {
    /// Create an empty session named after its position ("Séance N")
    #[must_use]
    pub fn numbered(id: u32) -> Self {
        Self {
            id,
            name: format!("{} {id}", program::SESSION_NAME_PREFIX),
            exercises: Vec::new(),
        }
    }
}

/// A template workout program, organized by week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutProgram {
    /// Program identifier (database id once saved, draft id before)
    pub id: String,
    /// Display name
    pub name: String,
    /// Training objective
    #[serde(default)]
    pub objective: String,
    /// Number of weeks (1..=52)
    pub week_count: u32,
    /// Owning coach
    #[serde(default)]
    pub coach_id: String,
    /// Client the program is being prepared for, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Sessions for each week number
    pub sessions_by_week: BTreeMap<u32, Vec<WorkoutSession>>,
    /// Weeks after week 1 that were edited directly and no longer mirror it
    #[serde(default)]
    pub customized_weeks: BTreeSet<u32>,
}

impl WorkoutProgram {
    /// Create a one-week program holding a single empty session
    #[must_use]
    pub fn new(id: impl Into<String>, coach_id: impl Into<String>) -> Self {
        let mut sessions_by_week = BTreeMap::new();
        sessions_by_week.insert(program::TEMPLATE_WEEK, vec![WorkoutSession::numbered(1)]);
        Self {
            id: id.into(),
            name: program::DEFAULT_PROGRAM_NAME.to_owned(),
            objective: String::new(),
            week_count: 1,
            coach_id: coach_id.into(),
            client_id: None,
            sessions_by_week,
            customized_weeks: BTreeSet::new(),
        }
    }

    /// Sessions of a week, empty when the week does not exist
    #[must_use]
    pub fn sessions(&self, week: u32) -> &[WorkoutSession] {
        self.sessions_by_week.get(&week).map_or(&[], Vec::as_slice)
    }

    /// Iterate over every exercise in every week
    pub fn all_exercises(&self) -> impl Iterator<Item = &WorkoutExercise> {
        self.sessions_by_week
            .values()
            .flatten()
            .flat_map(|session| session.exercises.iter())
    }

    /// Highest exercise id used anywhere in the program (0 when empty)
    #[must_use]
    pub fn max_exercise_id(&self) -> u32 {
        self.all_exercises().map(|e| e.id).max().unwrap_or(0)
    }

    /// Highest session id used anywhere in the program (0 when empty)
    #[must_use]
    pub fn max_session_id(&self) -> u32 {
        self.sessions_by_week
            .values()
            .flatten()
            .map(|s| s.id)
            .max()
            .unwrap_or(0)
    }

    /// Whether a week still mirrors the template week
    #[must_use]
    pub fn follows_template(&self, week: u32) -> bool {
        week != program::TEMPLATE_WEEK && !self.customized_weeks.contains(&week)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_program_has_one_session_in_week_one() {
        let program = WorkoutProgram::new("draft-1", "coach-1");
        assert_eq!(program.week_count, 1);
        assert_eq!(program.sessions(1).len(), 1);
        assert_eq!(program.sessions(1)[0].name, "Séance 1");
        assert!(program.sessions(2).is_empty());
    }

    #[test]
    fn test_program_json_uses_camel_case_and_string_week_keys() {
        let program = WorkoutProgram::new("draft-1", "coach-1");
        let json = serde_json::to_value(&program).unwrap();
        assert!(json.get("weekCount").is_some());
        assert!(json["sessionsByWeek"].get("1").is_some());

        let back: WorkoutProgram = serde_json::from_value(json).unwrap();
        assert_eq!(back, program);
    }

    #[test]
    fn test_load_unit_wire_names() {
        let detail = SetDetail {
            load: Load {
                value: "70".into(),
                unit: LoadUnit::Percent,
            },
            ..SetDetail::default()
        };
        let json = serde_json::to_string(&detail).unwrap();
        assert!(json.contains(r#""unit":"%""#));
        assert_eq!(LoadUnit::parse("RPE"), LoadUnit::Rpe);
        assert_eq!(LoadUnit::parse("furlongs"), LoadUnit::Kg);
    }
}
