// ABOUTME: Tag database operations
// ABOUTME: Tag CRUD, bulk loading and per-recipe tag lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::collections::HashMap;

use serde_json::json;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::{is_unique_violation, violated_column, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{NewTag, Tag, TagUpdate};

impl Database {
    pub(super) async fn migrate_tags(&self) -> AppResult<()> {
        self.execute_schema(
            &[r"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                color TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE
            )
            "],
            "tags",
        )
        .await
    }

    /// List all tags ordered by slug
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, color, slug FROM tags ORDER BY slug")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list tags: {e}")))?;

        Ok(rows.iter().map(Self::row_to_tag).collect())
    }

    /// Get a tag by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_tag(&self, id: i64) -> AppResult<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, color, slug FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get tag: {e}")))?;

        Ok(row.as_ref().map(Self::row_to_tag))
    }

    /// Create a tag
    ///
    /// # Errors
    ///
    /// Returns a conflict naming the field when name, color or slug is taken
    pub async fn create_tag(&self, tag: &NewTag) -> AppResult<Tag> {
        let result = sqlx::query("INSERT INTO tags (name, color, slug) VALUES ($1, $2, $3)")
            .bind(&tag.name)
            .bind(&tag.color)
            .bind(&tag.slug)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_tag_write_error(&e, "Failed to create tag"))?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            name: tag.name.clone(),
            color: tag.color.clone(),
            slug: tag.slug.clone(),
        })
    }

    /// Apply a partial tag update
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown tag, or a conflict on a taken value
    pub async fn update_tag(&self, id: i64, update: &TagUpdate) -> AppResult<Tag> {
        let result = sqlx::query(
            r"
            UPDATE tags
            SET name = COALESCE($1, name),
                color = COALESCE($2, color),
                slug = COALESCE($3, slug)
            WHERE id = $4
            ",
        )
        .bind(update.name.as_deref())
        .bind(update.color.as_deref())
        .bind(update.slug.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_tag_write_error(&e, "Failed to update tag"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Tag").with_resource_id(id.to_string()));
        }

        self.get_tag(id)
            .await?
            .ok_or_else(|| AppError::not_found("Tag").with_resource_id(id.to_string()))
    }

    /// Delete a tag; recipe associations go with it
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_tag(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete tag: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Insert tags, skipping any that collide with an existing tag
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails
    pub async fn load_tags(&self, tags: &[NewTag]) -> AppResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let mut inserted = 0;
        for tag in tags {
            let result =
                sqlx::query("INSERT OR IGNORE INTO tags (name, color, slug) VALUES ($1, $2, $3)")
                    .bind(&tag.name)
                    .bind(&tag.color)
                    .bind(&tag.slug)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| AppError::database(format!("Failed to load tag: {e}")))?;
            inserted += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit tags: {e}")))?;
        Ok(inserted)
    }

    /// Tags of each recipe, ordered by slug
    pub(super) async fn tags_for_recipes(
        &self,
        recipe_ids: &[i64],
    ) -> AppResult<HashMap<i64, Vec<Tag>>> {
        let mut by_recipe: HashMap<i64, Vec<Tag>> = HashMap::new();
        if recipe_ids.is_empty() {
            return Ok(by_recipe);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            r"
            SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in recipe_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY t.slug");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load recipe tags: {e}")))?;

        for row in &rows {
            by_recipe
                .entry(row.get("recipe_id"))
                .or_default()
                .push(Self::row_to_tag(row));
        }
        Ok(by_recipe)
    }

    fn map_tag_write_error(error: &sqlx::Error, context: &str) -> AppError {
        if !is_unique_violation(error) {
            return AppError::database(format!("{context}: {error}"));
        }

        let field = violated_column(error).unwrap_or_else(|| "name".to_owned());
        let message = format!("A tag with this {field} already exists.");
        AppError::already_exists(message.clone()).with_details(json!({ field: [message] }))
    }

    fn row_to_tag(row: &SqliteRow) -> Tag {
        Tag {
            id: row.get("id"),
            name: row.get("name"),
            color: row.get("color"),
            slug: row.get("slug"),
        }
    }
}
