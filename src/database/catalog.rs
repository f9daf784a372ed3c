// ABOUTME: Database operations for the shared exercise catalog
// ABOUTME: Upserts library entries and resolves names and illustrations by id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::HashMap;
use virtus_core::models::{CatalogExercise, ExerciseInfo};

/// Exercise catalog database operations manager
pub struct CatalogManager {
    pool: SqlitePool,
}

impl CatalogManager {
    /// Create a new catalog manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace a catalog exercise
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn upsert(&self, exercise: &CatalogExercise) -> AppResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO exercises (
                id, name, category, muscle_group, equipment, image_url, video_url,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                muscle_group = excluded.muscle_group,
                equipment = excluded.equipment,
                image_url = excluded.image_url,
                video_url = excluded.video_url,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&exercise.id)
        .bind(&exercise.name)
        .bind(&exercise.category)
        .bind(&exercise.muscle_group)
        .bind(&exercise.equipment)
        .bind(&exercise.illustration_url)
        .bind(&exercise.video_url)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert exercise: {e}")))?;

        Ok(())
    }

    /// Get a catalog exercise by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: &str) -> AppResult<Option<CatalogExercise>> {
        let row = sqlx::query(
            r"
            SELECT id, name, category, muscle_group, equipment, image_url, video_url
            FROM exercises
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get exercise: {e}")))?;

        Ok(row.as_ref().map(row_to_catalog_exercise))
    }

    /// Resolve names and illustrations for a set of exercise ids
    ///
    /// Unknown ids are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_by_ids(&self, ids: &[String]) -> AppResult<HashMap<String, ExerciseInfo>> {
        let mut unique: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| !id.is_empty())
            .collect();
        unique.sort_unstable();
        unique.dedup();

        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = (1..=unique.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT id, name, category, muscle_group, equipment, image_url, video_url \
             FROM exercises WHERE id IN ({placeholders})"
        );

        let mut query = sqlx::query(&sql);
        for id in &unique {
            query = query.bind(*id);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to resolve exercises: {e}")))?;

        Ok(rows
            .iter()
            .map(row_to_catalog_exercise)
            .map(|exercise| (exercise.id.clone(), exercise.info()))
            .collect())
    }
}

/// Convert a database row to a `CatalogExercise`
fn row_to_catalog_exercise(row: &SqliteRow) -> CatalogExercise {
    CatalogExercise {
        id: row.get("id"),
        name: row.get("name"),
        category: row.get("category"),
        muscle_group: row.get("muscle_group"),
        equipment: row.get("equipment"),
        illustration_url: row.get("image_url"),
        video_url: row.get("video_url"),
    }
}
