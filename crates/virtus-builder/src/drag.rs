// ABOUTME: Drag-and-drop payload decoding for catalog exercises, foods, and meals
// ABOUTME: Accepts the tagged {type, data} envelope or a bare serialized exercise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use serde_json::Value;
use virtus_core::errors::{AppError, AppResult};
use virtus_core::models::CatalogExercise;

/// Something dragged from a library sidebar onto the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragPayload {
    /// A single food item (nutrition editor)
    Food(Value),
    /// A whole meal (nutrition editor)
    Meal(Value),
    /// A catalog exercise (workout editor)
    Exercise(CatalogExercise),
}

#[derive(Deserialize)]
struct TaggedEnvelope {
    #[serde(rename = "type")]
    kind: String,
    data: Value,
}

impl DragPayload {
    /// Decode the text carried by a drop event
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or matches no known payload
    pub fn parse(text: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| AppError::invalid_input(format!("Drop payload is not JSON: {e}")))?;

        if let Ok(envelope) = serde_json::from_value::<TaggedEnvelope>(value.clone()) {
            match envelope.kind.as_str() {
                "food" => return Ok(Self::Food(envelope.data)),
                "meal" => return Ok(Self::Meal(envelope.data)),
                "exercise" => {
                    return serde_json::from_value(envelope.data)
                        .map(Self::Exercise)
                        .map_err(|e| {
                            AppError::invalid_input(format!("Invalid dropped exercise: {e}"))
                        });
                }
                _ => {}
            }
        }

        serde_json::from_value(value)
            .map(Self::Exercise)
            .map_err(|e| AppError::invalid_input(format!("Unrecognized drop payload: {e}")))
    }

    /// The dropped catalog exercise, if any
    #[must_use]
    pub const fn as_exercise(&self) -> Option<&CatalogExercise> {
        match self {
            Self::Exercise(exercise) => Some(exercise),
            Self::Food(_) | Self::Meal(_) => None,
        }
    }
}
