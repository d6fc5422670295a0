// ABOUTME: Ingredient database operations
// ABOUTME: Lookup, name search, creation and bulk loading of the ingredient catalogue
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use serde_json::json;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::{is_unique_violation, Database};
use crate::errors::{AppError, AppResult};
use crate::filters::{name_search_patterns, rank_by_name};
use crate::models::{Ingredient, NewIngredient};

impl Database {
    pub(super) async fn migrate_ingredients(&self) -> AppResult<()> {
        self.execute_schema(
            &[
                r"
                CREATE TABLE IF NOT EXISTS ingredients (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    measurement_unit TEXT NOT NULL,
                    UNIQUE (name, measurement_unit)
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_ingredients_name ON ingredients(name)",
            ],
            "ingredients",
        )
        .await
    }

    /// List ingredients, optionally filtered by a name fragment
    ///
    /// Matching is case-insensitive (Unicode aware); names starting with the
    /// fragment come before names merely containing it. A `LIKE` prefilter
    /// narrows the rows in SQL before the ranking.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn search_ingredients(&self, name: Option<&str>) -> AppResult<Vec<Ingredient>> {
        let patterns = name.map(name_search_patterns).unwrap_or_default();

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, name, measurement_unit FROM ingredients");
        if !patterns.is_empty() {
            builder.push(" WHERE ");
            let mut separated = builder.separated(" OR ");
            for pattern in &patterns {
                separated.push("name LIKE ");
                separated.push_bind_unseparated(pattern.as_str());
                separated.push_unseparated(r" ESCAPE '\'");
            }
        }
        builder.push(" ORDER BY name, measurement_unit");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        let ingredients: Vec<Ingredient> = rows.iter().map(Self::row_to_ingredient).collect();
        Ok(match name {
            Some(fragment) => rank_by_name(ingredients, fragment, |i| i.name.as_str()),
            None => ingredients,
        })
    }

    /// Get an ingredient by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_ingredient(&self, id: i64) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query("SELECT id, name, measurement_unit FROM ingredients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

        Ok(row.as_ref().map(Self::row_to_ingredient))
    }

    /// Create an ingredient
    ///
    /// # Errors
    ///
    /// Returns a conflict when the (name, unit) pair already exists
    pub async fn create_ingredient(&self, ingredient: &NewIngredient) -> AppResult<Ingredient> {
        let result =
            sqlx::query("INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2)")
                .bind(&ingredient.name)
                .bind(&ingredient.measurement_unit)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        let message = "This ingredient with this unit already exists.";
                        AppError::already_exists(message)
                            .with_details(json!({ "name": [message] }))
                    } else {
                        AppError::database(format!("Failed to create ingredient: {e}"))
                    }
                })?;

        Ok(Ingredient {
            id: result.last_insert_rowid(),
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
        })
    }

    /// Insert ingredients, skipping (name, unit) pairs that already exist
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails
    pub async fn load_ingredients(&self, ingredients: &[NewIngredient]) -> AppResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let mut inserted = 0;
        for ingredient in ingredients {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO ingredients (name, measurement_unit) VALUES ($1, $2)",
            )
            .bind(&ingredient.name)
            .bind(&ingredient.measurement_unit)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to load ingredient: {e}")))?;
            inserted += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit ingredients: {e}")))?;
        Ok(inserted)
    }

    fn row_to_ingredient(row: &SqliteRow) -> Ingredient {
        Ingredient {
            id: row.get("id"),
            name: row.get("name"),
            measurement_unit: row.get("measurement_unit"),
        }
    }
}
