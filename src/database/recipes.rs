// ABOUTME: Recipe database operations with tag and ingredient associations
// ABOUTME: Transactional create/update, filtered listing and batch hydration of recipe views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection};
use tracing::debug;

use super::{is_check_violation, parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::filters::RecipeFilter;
use crate::models::{
    IngredientAmount, MembershipKind, Recipe, RecipeDetail, RecipeDraft, RecipeIngredient,
    RecipePatch, RecipeSummary, User,
};

const RECIPE_COLUMNS: &str =
    "r.id, r.author_id, r.name, r.text, r.cooking_time, r.image, r.created_at";

impl Database {
    pub(super) async fn migrate_recipes(&self) -> AppResult<()> {
        self.execute_schema(
            &[
                r"
                CREATE TABLE IF NOT EXISTS recipes (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    name TEXT NOT NULL,
                    text TEXT NOT NULL,
                    cooking_time INTEGER NOT NULL CHECK (cooking_time BETWEEN 1 AND 32000),
                    image TEXT,
                    created_at TEXT NOT NULL
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)",
                r"
                CREATE TABLE IF NOT EXISTS recipe_tags (
                    recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                    PRIMARY KEY (recipe_id, tag_id)
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_recipe_tags_tag ON recipe_tags(tag_id)",
                r"
                CREATE TABLE IF NOT EXISTS recipe_ingredients (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                    ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE RESTRICT,
                    amount INTEGER NOT NULL CHECK (amount BETWEEN 1 AND 32000),
                    UNIQUE (recipe_id, ingredient_id)
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_ingredient ON recipe_ingredients(ingredient_id)",
            ],
            "recipes",
        )
        .await
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Create a recipe with its tags and ingredient amounts in one transaction
    ///
    /// # Errors
    ///
    /// Returns a field error for unknown tag or ingredient ids, or a database
    /// error if the transaction fails
    pub async fn create_recipe(&self, author_id: i64, draft: &RecipeDraft) -> AppResult<i64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        Self::ensure_tags_exist(&mut tx, &draft.tags).await?;
        Self::ensure_ingredients_exist(&mut tx, &draft.ingredients).await?;

        let result = sqlx::query(
            r"
            INSERT INTO recipes (author_id, name, text, cooking_time, image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(author_id)
        .bind(&draft.name)
        .bind(&draft.text)
        .bind(draft.cooking_time)
        .bind(draft.image.as_deref())
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::map_recipe_write_error(&e, "Failed to create recipe"))?;
        let recipe_id = result.last_insert_rowid();

        Self::insert_recipe_tags(&mut tx, recipe_id, &draft.tags).await?;
        Self::insert_recipe_ingredients(&mut tx, recipe_id, &draft.ingredients).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe: {e}")))?;

        debug!(recipe_id, author_id, "Recipe created");
        Ok(recipe_id)
    }

    /// Apply a partial update; supplied tag/ingredient sets replace the old ones
    ///
    /// Returns the image path the patch replaced, if any. The old path is read
    /// after the first write so the transaction already holds the write lock.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown recipe, a field error for unknown
    /// tag or ingredient ids, or a database error if the transaction fails
    pub async fn update_recipe(
        &self,
        recipe_id: i64,
        patch: &RecipePatch,
    ) -> AppResult<Option<String>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query(
            r"
            UPDATE recipes
            SET name = COALESCE($1, name),
                text = COALESCE($2, text),
                cooking_time = COALESCE($3, cooking_time)
            WHERE id = $4
            ",
        )
        .bind(patch.name.as_deref())
        .bind(patch.text.as_deref())
        .bind(patch.cooking_time)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::map_recipe_write_error(&e, "Failed to update recipe"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Recipe").with_resource_id(recipe_id.to_string()));
        }

        let mut replaced = None;
        if let Some(image) = &patch.image {
            let previous: Option<String> =
                sqlx::query_scalar("SELECT image FROM recipes WHERE id = $1")
                    .bind(recipe_id)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| AppError::database(format!("Failed to read recipe image: {e}")))?;
            sqlx::query("UPDATE recipes SET image = $1 WHERE id = $2")
                .bind(image)
                .bind(recipe_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to update recipe image: {e}")))?;
            replaced = previous.filter(|old| old != image);
        }

        if let Some(tags) = &patch.tags {
            Self::ensure_tags_exist(&mut tx, tags).await?;
            sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
                .bind(recipe_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to clear recipe tags: {e}")))?;
            Self::insert_recipe_tags(&mut tx, recipe_id, tags).await?;
        }

        if let Some(ingredients) = &patch.ingredients {
            Self::ensure_ingredients_exist(&mut tx, ingredients).await?;
            sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
                .bind(recipe_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::database(format!("Failed to clear recipe ingredients: {e}"))
                })?;
            Self::insert_recipe_ingredients(&mut tx, recipe_id, ingredients).await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe update: {e}")))?;

        debug!(recipe_id, "Recipe updated");
        Ok(replaced)
    }

    /// Delete a recipe; associations, favourites and cart entries cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_recipe(&self, recipe_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn ensure_tags_exist(conn: &mut SqliteConnection, tag_ids: &[i64]) -> AppResult<()> {
        let found = Self::existing_ids(conn, "tags", tag_ids).await?;
        match tag_ids.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(AppError::field(
                "tags",
                format!("Tag with id {missing} does not exist."),
            )),
            None => Ok(()),
        }
    }

    async fn ensure_ingredients_exist(
        conn: &mut SqliteConnection,
        ingredients: &[IngredientAmount],
    ) -> AppResult<()> {
        let ids: Vec<i64> = ingredients.iter().map(|i| i.ingredient_id).collect();
        let found = Self::existing_ids(conn, "ingredients", &ids).await?;
        match ids.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(AppError::field(
                "ingredients",
                format!("Ingredient with id {missing} does not exist."),
            )),
            None => Ok(()),
        }
    }

    /// Subset of `ids` present in `table`; `table` is always a fixed identifier
    async fn existing_ids(
        conn: &mut SqliteConnection,
        table: &str,
        ids: &[i64],
    ) -> AppResult<HashSet<i64>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT id FROM {table} WHERE id IN ("));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let found: Vec<i64> = builder
            .build_query_scalar()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up {table}: {e}")))?;

        Ok(found.into_iter().collect())
    }

    async fn insert_recipe_tags(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        tag_ids: &[i64],
    ) -> AppResult<()> {
        for tag_id in tag_ids {
            sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
                .bind(recipe_id)
                .bind(tag_id)
                .execute(&mut *conn)
                .await
                .map_err(|e| AppError::database(format!("Failed to attach tag: {e}")))?;
        }
        Ok(())
    }

    async fn insert_recipe_ingredients(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        ingredients: &[IngredientAmount],
    ) -> AppResult<()> {
        for line in ingredients {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES ($1, $2, $3)",
            )
            .bind(recipe_id)
            .bind(line.ingredient_id)
            .bind(line.amount)
            .execute(&mut *conn)
            .await
            .map_err(|e| Self::map_recipe_write_error(&e, "Failed to attach ingredient"))?;
        }
        Ok(())
    }

    fn map_recipe_write_error(error: &sqlx::Error, context: &str) -> AppError {
        if is_check_violation(error) {
            AppError::invalid_input(format!("{context}: value out of range"))
        } else {
            AppError::database(format!("{context}: {error}"))
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Get a stored recipe row
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_recipe(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1"
        ))
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.map(|r| Self::row_to_recipe(&r)).transpose()
    }

    /// Get a stored recipe row, failing with not-found when absent
    ///
    /// # Errors
    ///
    /// Returns not-found if the recipe does not exist
    pub async fn get_recipe_required(&self, recipe_id: i64) -> AppResult<Recipe> {
        self.get_recipe(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe").with_resource_id(recipe_id.to_string()))
    }

    /// Get a fully hydrated recipe as seen by `viewer`
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn get_recipe_detail(
        &self,
        recipe_id: i64,
        viewer: Option<i64>,
    ) -> AppResult<Option<RecipeDetail>> {
        let Some(recipe) = self.get_recipe(recipe_id).await? else {
            return Ok(None);
        };
        Ok(self.hydrate_recipes(vec![recipe], viewer).await?.pop())
    }

    /// List recipes newest first, applying `filter` relative to `viewer`
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn list_recipes(
        &self,
        filter: &RecipeFilter,
        viewer: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<RecipeDetail>, i64)> {
        let mut count_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM recipes r WHERE 1 = 1");
        Self::push_recipe_filters(&mut count_query, filter, viewer);
        let count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        let mut list_query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE 1 = 1"));
        Self::push_recipe_filters(&mut list_query, filter, viewer);
        list_query.push(" ORDER BY r.id DESC LIMIT ");
        list_query.push_bind(limit);
        list_query.push(" OFFSET ");
        list_query.push_bind(offset);

        let rows = list_query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let recipes = rows
            .iter()
            .map(Self::row_to_recipe)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((self.hydrate_recipes(recipes, viewer).await?, count))
    }

    fn push_recipe_filters(
        builder: &mut QueryBuilder<'_, Sqlite>,
        filter: &RecipeFilter,
        viewer: Option<i64>,
    ) {
        if !filter.authors.is_empty() {
            builder.push(" AND r.author_id IN (");
            let mut separated = builder.separated(", ");
            for author in &filter.authors {
                separated.push_bind(*author);
            }
            separated.push_unseparated(")");
        }

        if !filter.tags.is_empty() {
            builder.push(
                " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
                 WHERE rt.recipe_id = r.id AND t.slug IN (",
            );
            let mut separated = builder.separated(", ");
            for slug in &filter.tags {
                separated.push_bind(slug.clone());
            }
            separated.push_unseparated("))");
        }

        Self::push_membership_filter(builder, MembershipKind::Favourite, filter.is_favorited, viewer);
        Self::push_membership_filter(
            builder,
            MembershipKind::ShoppingCart,
            filter.is_in_shopping_cart,
            viewer,
        );
    }

    /// Anonymous viewers have no memberships: "only members" matches nothing,
    /// "exclude members" matches everything
    fn push_membership_filter(
        builder: &mut QueryBuilder<'_, Sqlite>,
        kind: MembershipKind,
        wanted: Option<bool>,
        viewer: Option<i64>,
    ) {
        match (wanted, viewer) {
            (None, _) | (Some(false), None) => {}
            (Some(true), None) => {
                builder.push(" AND 0");
            }
            (Some(keep), Some(user_id)) => {
                builder.push(if keep { " AND EXISTS" } else { " AND NOT EXISTS" });
                builder.push(format!(
                    " (SELECT 1 FROM {} m WHERE m.recipe_id = r.id AND m.user_id = ",
                    kind.table()
                ));
                builder.push_bind(user_id);
                builder.push(")");
            }
        }
    }

    /// Attach authors, tags, ingredients and viewer flags to recipe rows
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn hydrate_recipes(
        &self,
        recipes: Vec<Recipe>,
        viewer: Option<i64>,
    ) -> AppResult<Vec<RecipeDetail>> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }

        let recipe_ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<i64> = recipes.iter().map(|r| r.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let mut tags = self.tags_for_recipes(&recipe_ids).await?;
        let mut ingredients = self.ingredients_for_recipes(&recipe_ids).await?;
        let authors: HashMap<i64, User> = self
            .get_users_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let (favourites, cart, subscribed) = match viewer {
            Some(user_id) => (
                self.membership_set(MembershipKind::Favourite, user_id, &recipe_ids)
                    .await?,
                self.membership_set(MembershipKind::ShoppingCart, user_id, &recipe_ids)
                    .await?,
                self.subscribed_among(user_id, &author_ids).await?,
            ),
            None => (HashSet::new(), HashSet::new(), HashSet::new()),
        };

        recipes
            .into_iter()
            .map(|recipe| {
                let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                    AppError::internal(format!("Author {} of recipe {} missing", recipe.author_id, recipe.id))
                })?;
                Ok(RecipeDetail {
                    author_is_subscribed: subscribed.contains(&recipe.author_id),
                    author,
                    tags: tags.remove(&recipe.id).unwrap_or_default(),
                    ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                    is_favorited: favourites.contains(&recipe.id),
                    is_in_shopping_cart: cart.contains(&recipe.id),
                    recipe,
                })
            })
            .collect()
    }

    async fn ingredients_for_recipes(
        &self,
        recipe_ids: &[i64],
    ) -> AppResult<HashMap<i64, Vec<RecipeIngredient>>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            r"
            SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in recipe_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY ri.id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load recipe ingredients: {e}")))?;

        let mut by_recipe: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
        for row in &rows {
            by_recipe
                .entry(row.get("recipe_id"))
                .or_default()
                .push(RecipeIngredient {
                    id: row.get("id"),
                    name: row.get("name"),
                    measurement_unit: row.get("measurement_unit"),
                    amount: row.get("amount"),
                });
        }
        Ok(by_recipe)
    }

    /// Newest recipes of each author, at most `limit` per author when given
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn recipe_summaries_for_authors(
        &self,
        author_ids: &[i64],
        limit: Option<i64>,
    ) -> AppResult<HashMap<i64, Vec<RecipeSummary>>> {
        let mut by_author: HashMap<i64, Vec<RecipeSummary>> = HashMap::new();
        if author_ids.is_empty() {
            return Ok(by_author);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            r"
            SELECT id, author_id, name, image, cooking_time FROM (
                SELECT r.id, r.author_id, r.name, r.image, r.cooking_time,
                       ROW_NUMBER() OVER (PARTITION BY r.author_id ORDER BY r.id DESC) AS position
                FROM recipes r
                WHERE r.author_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in author_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")) ");
        match limit {
            Some(limit) => {
                builder.push("WHERE position <= ");
                builder.push_bind(limit);
            }
            None => {
                builder.push("WHERE 1 = 1");
            }
        }
        builder.push(" ORDER BY author_id, position");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load author recipes: {e}")))?;

        for row in &rows {
            by_author
                .entry(row.get("author_id"))
                .or_default()
                .push(RecipeSummary {
                    id: row.get("id"),
                    name: row.get("name"),
                    image: row.get("image"),
                    cooking_time: row.get("cooking_time"),
                });
        }
        Ok(by_author)
    }

    /// Number of recipes per author
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn recipe_counts_for_authors(
        &self,
        author_ids: &[i64],
    ) -> AppResult<HashMap<i64, i64>> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT author_id, COUNT(*) AS total FROM recipes WHERE author_id IN (");
        let mut separated = builder.separated(", ");
        for id in author_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") GROUP BY author_id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count author recipes: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| (row.get("author_id"), row.get("total")))
            .collect())
    }

    fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
        let created_at: String = row.get("created_at");
        Ok(Recipe {
            id: row.get("id"),
            author_id: row.get("author_id"),
            name: row.get("name"),
            text: row.get("text"),
            cooking_time: row.get("cooking_time"),
            image: row.get("image"),
            created_at: parse_timestamp(&created_at)?,
        })
    }
}
