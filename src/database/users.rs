// ABOUTME: User account database operations
// ABOUTME: Registration, lookup by id/email, profile updates, passwords and roles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use chrono::Utc;
use serde_json::json;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{is_unique_violation, parse_timestamp, violated_column, Database};
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User, UserUpdate};
use crate::permissions::UserRole;

const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, password_hash, role, is_active, date_joined";

impl Database {
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        self.execute_schema(
            &[r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'moderator', 'admin')),
                is_active INTEGER NOT NULL DEFAULT 1,
                date_joined TEXT NOT NULL
            )
            "],
            "users",
        )
        .await
    }

    /// Create a user account
    ///
    /// # Errors
    ///
    /// Returns a conflict naming the field when the username or email is taken
    pub async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        let now = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO users (username, email, first_name, last_name, password_hash, role, is_active, date_joined)
            VALUES ($1, $2, $3, $4, $5, $6, 1, $7)
            ",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_user_write_error(&e, "Failed to create user"))?;

        self.get_user(result.last_insert_rowid())
            .await?
            .ok_or_else(|| AppError::internal("Created user could not be read back"))
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// Get a user by id, failing with not-found when absent
    ///
    /// # Errors
    ///
    /// Returns not-found if the user does not exist
    pub async fn get_user_required(&self, id: i64) -> AppResult<User> {
        self.get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("User").with_resource_id(id.to_string()))
    }

    /// Get a user by email (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// Get a user by username
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user by username: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// List users ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_users(&self, limit: i64, offset: i64) -> AppResult<(Vec<User>, i64)> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?;

        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list users: {e}")))?;

        let users = rows.iter().map(Self::row_to_user).collect::<AppResult<_>>()?;
        Ok((users, count))
    }

    /// Get several users by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_users_by_ids(&self, ids: &[i64]) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = sqlx::QueryBuilder::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id IN ("
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get users: {e}")))?;

        rows.iter().map(Self::row_to_user).collect()
    }

    /// Apply a partial profile update
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown user, or a conflict when the new
    /// username or email is taken
    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> AppResult<User> {
        if !update.is_empty() {
            sqlx::query(
                r"
                UPDATE users
                SET username = COALESCE($1, username),
                    email = COALESCE($2, email),
                    first_name = COALESCE($3, first_name),
                    last_name = COALESCE($4, last_name)
                WHERE id = $5
                ",
            )
            .bind(update.username.as_deref())
            .bind(update.email.as_deref())
            .bind(update.first_name.as_deref())
            .bind(update.last_name.as_deref())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_user_write_error(&e, "Failed to update user"))?;
        }

        self.get_user_required(id).await
    }

    /// Replace a user's password hash
    ///
    /// # Errors
    ///
    /// Returns not-found if the user does not exist
    pub async fn set_password_hash(&self, id: i64, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update password: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    /// Change a user's role
    ///
    /// # Errors
    ///
    /// Returns not-found if the user does not exist
    pub async fn set_user_role(&self, id: i64, role: UserRole) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
            .bind(role.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update role: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    /// Activate or deactivate an account
    ///
    /// # Errors
    ///
    /// Returns not-found if the user does not exist
    pub async fn set_user_active(&self, id: i64, is_active: bool) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET is_active = $1 WHERE id = $2")
            .bind(is_active)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update user status: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    fn map_user_write_error(error: &sqlx::Error, context: &str) -> AppError {
        if !is_unique_violation(error) {
            return AppError::database(format!("{context}: {error}"));
        }

        let (field, message) = match violated_column(error).as_deref() {
            Some("email") => ("email", error_messages::EMAIL_TAKEN),
            _ => ("username", error_messages::USERNAME_TAKEN),
        };
        AppError::already_exists(message).with_details(json!({ field: [message] }))
    }

    pub(super) fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let role: String = row.get("role");
        let date_joined: String = row.get("date_joined");

        Ok(User {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            password_hash: row.get("password_hash"),
            role: role
                .parse()
                .map_err(|e: AppError| AppError::database(e.to_string()))?,
            is_active: row.get("is_active"),
            date_joined: parse_timestamp(&date_joined)?,
        })
    }
}
