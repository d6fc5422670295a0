// ABOUTME: Favourite and shopping-cart membership storage
// ABOUTME: Both relations are (user, recipe) pairs kept unique by an index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::collections::HashSet;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

use super::{is_foreign_key_violation, is_unique_violation, Database};
use crate::errors::{AppError, AppResult};
use crate::models::MembershipKind;

impl Database {
    pub(super) async fn migrate_memberships(&self) -> AppResult<()> {
        for kind in [MembershipKind::Favourite, MembershipKind::ShoppingCart] {
            let table = kind.table();
            let create = format!(
                r"
                CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                    created_at TEXT NOT NULL,
                    UNIQUE (user_id, recipe_id)
                )
                "
            );
            let index =
                format!("CREATE INDEX IF NOT EXISTS idx_{table}_recipe ON {table}(recipe_id)");
            self.execute_schema(&[create.as_str(), index.as_str()], table)
                .await?;
        }
        Ok(())
    }

    /// Add a recipe to the user's favourites or shopping cart
    ///
    /// # Errors
    ///
    /// Returns a conflict when the pair already exists, and not-found when
    /// the recipe is gone by the time of the insert
    pub async fn add_membership(
        &self,
        kind: MembershipKind,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<()> {
        sqlx::query(&format!(
            "INSERT INTO {} (user_id, recipe_id, created_at) VALUES ($1, $2, $3)",
            kind.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(kind.already_present_message())
            } else if is_foreign_key_violation(&e) {
                AppError::not_found("Recipe").with_resource_id(recipe_id.to_string())
            } else {
                AppError::database(format!("Failed to add {kind} entry: {e}"))
            }
        })?;

        debug!(user_id, recipe_id, %kind, "Membership added");
        Ok(())
    }

    /// Remove a membership, reporting whether one existed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn remove_membership(
        &self,
        kind: MembershipKind,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            kind.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to remove {kind} entry: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Which of `recipe_ids` the user holds in the given relation
    pub(super) async fn membership_set(
        &self,
        kind: MembershipKind,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> AppResult<HashSet<i64>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT recipe_id FROM {} WHERE user_id = ",
            kind.table()
        ));
        builder.push_bind(user_id);
        builder.push(" AND recipe_id IN (");
        let mut separated = builder.separated(", ");
        for id in recipe_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let found: Vec<i64> = builder
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load {kind} entries: {e}")))?;

        Ok(found.into_iter().collect())
    }
}
