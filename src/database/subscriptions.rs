// ABOUTME: Author subscription storage
// ABOUTME: Subscribe/unsubscribe, lookups and the paginated list of followed authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::collections::HashSet;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

use super::{is_check_violation, is_foreign_key_violation, is_unique_violation, Database};
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};
use crate::models::User;

impl Database {
    pub(super) async fn migrate_subscriptions(&self) -> AppResult<()> {
        self.execute_schema(
            &[
                r"
                CREATE TABLE IF NOT EXISTS subscriptions (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    subscribing_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    created_at TEXT NOT NULL,
                    UNIQUE (user_id, subscribing_id),
                    CHECK (user_id <> subscribing_id)
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_subscriptions_author ON subscriptions(subscribing_id)",
            ],
            "subscriptions",
        )
        .await
    }

    /// Subscribe `user_id` to `author_id`
    ///
    /// # Errors
    ///
    /// Returns invalid input for a self-subscription and a conflict when the
    /// subscription already exists
    pub async fn subscribe(&self, user_id: i64, author_id: i64) -> AppResult<()> {
        if user_id == author_id {
            return Err(AppError::invalid_input(error_messages::SELF_SUBSCRIPTION));
        }

        sqlx::query(
            "INSERT INTO subscriptions (user_id, subscribing_id, created_at) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(author_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(error_messages::ALREADY_SUBSCRIBED)
            } else if is_check_violation(&e) {
                AppError::invalid_input(error_messages::SELF_SUBSCRIPTION)
            } else if is_foreign_key_violation(&e) {
                AppError::not_found("User").with_resource_id(author_id.to_string())
            } else {
                AppError::database(format!("Failed to subscribe: {e}"))
            }
        })?;

        debug!(user_id, author_id, "Subscription created");
        Ok(())
    }

    /// Remove a subscription, reporting whether one existed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn unsubscribe(&self, user_id: i64, author_id: i64) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND subscribing_id = $2")
                .bind(user_id)
                .bind(author_id)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to unsubscribe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether `user_id` follows `author_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn is_subscribed(&self, user_id: i64, author_id: i64) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM subscriptions WHERE user_id = $1 AND subscribing_id = $2",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check subscription: {e}")))?;

        Ok(found.is_some())
    }

    /// Which of `author_ids` the user follows
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn subscribed_among(
        &self,
        user_id: i64,
        author_ids: &[i64],
    ) -> AppResult<HashSet<i64>> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT subscribing_id FROM subscriptions WHERE user_id = ");
        builder.push_bind(user_id);
        builder.push(" AND subscribing_id IN (");
        let mut separated = builder.separated(", ");
        for id in author_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let found: Vec<i64> = builder
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load subscriptions: {e}")))?;

        Ok(found.into_iter().collect())
    }

    /// Authors followed by `user_id`, most recent subscription first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_subscriptions(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to count subscriptions: {e}")))?;

        let rows = sqlx::query(
            r"
            SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.password_hash,
                   u.role, u.is_active, u.date_joined
            FROM subscriptions s
            JOIN users u ON u.id = s.subscribing_id
            WHERE s.user_id = $1
            ORDER BY s.id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list subscriptions: {e}")))?;

        let authors = rows
            .iter()
            .map(Self::row_to_user)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((authors, count))
    }
}
