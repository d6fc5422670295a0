// ABOUTME: Shopping list aggregation over the user's cart
// ABOUTME: Sums ingredient amounts across carted recipes grouped by name and unit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use sqlx::Row;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::ShoppingListItem;

impl Database {
    /// Aggregated ingredients of every recipe in the user's cart
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn shopping_list(&self, user_id: i64) -> AppResult<Vec<ShoppingListItem>> {
        let rows = sqlx::query(
            r"
            SELECT i.name, i.measurement_unit, SUM(ri.amount) AS total_amount
            FROM shopping_cart sc
            JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sc.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name, i.measurement_unit
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to build shopping list: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| ShoppingListItem {
                name: row.get("name"),
                measurement_unit: row.get("measurement_unit"),
                total_amount: row.get("total_amount"),
            })
            .collect())
    }
}
