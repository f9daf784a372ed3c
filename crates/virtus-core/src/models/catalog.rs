// ABOUTME: Exercise catalog models used to resolve names and illustrations
// ABOUTME: CatalogExercise is the full library entry, ExerciseInfo the lookup projection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// An exercise from the shared library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExercise {
    /// Catalog id
    pub id: String,
    /// Display name
    pub name: String,
    /// Category (musculation, cardio, mobility, ...)
    #[serde(default)]
    pub category: Option<String>,
    /// Primary muscle group
    #[serde(default)]
    pub muscle_group: Option<String>,
    /// Required equipment
    #[serde(default)]
    pub equipment: Option<String>,
    /// Illustration URL
    #[serde(default)]
    pub illustration_url: Option<String>,
    /// Demonstration video URL
    #[serde(default)]
    pub video_url: Option<String>,
}

impl CatalogExercise {
    /// Projection used when resolving exercise references
    #[must_use]
    pub fn info(&self) -> ExerciseInfo {
        ExerciseInfo {
            name: self.name.clone(),
            illustration_url: self.illustration_url.clone().unwrap_or_default(),
        }
    }
}

/// Name and illustration of a catalog exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseInfo {
    /// Display name
    pub name: String,
    /// Illustration URL (empty when none)
    pub illustration_url: String,
}
