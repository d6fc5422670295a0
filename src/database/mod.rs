// ABOUTME: SQLite storage for users, recipes, reference data and memberships
// ABOUTME: Owns the connection pool, schema migrations and shared row-parsing helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! # Database Management
//!
//! `Database` wraps an `sqlx` SQLite pool. Operations are split across files
//! by domain, each adding an `impl Database` block. Uniqueness rules (user
//! email/username, tag fields, ingredient name+unit, membership pairs,
//! subscription pairs) are enforced by unique indexes so concurrent writers
//! cannot race past an application-level check.

mod ingredients;
mod memberships;
mod recipes;
mod shopping_list;
mod subscriptions;
mod tags;
mod users;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::config::{DatabaseConfig, DatabaseUrl};
use crate::errors::{AppError, AppResult};

/// Database manager for all persistent state
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection fails
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        if let DatabaseUrl::SQLite { path } = &config.url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::database(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let db = Self::new(&config.url.to_connection_string(), config.max_connections).await?;
        if config.auto_migrate {
            db.migrate().await?;
        }
        Ok(db)
    }

    /// Create a new database connection pool
    ///
    /// In-memory databases use a single long-lived connection: each SQLite
    /// memory connection is its own database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection fails
    pub async fn new(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let is_memory = database_url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::database(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);
        if !is_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool_options = if is_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        debug!(url = %database_url, "Database pool opened");
        Ok(Self { pool })
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any schema statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_tags().await?;
        self.migrate_ingredients().await?;
        self.migrate_recipes().await?;
        self.migrate_memberships().await?;
        self.migrate_subscriptions().await?;

        info!("Database migrations complete");
        Ok(())
    }

    /// Run a list of schema statements in order
    async fn execute_schema(&self, statements: &[&str], what: &str) -> AppResult<()> {
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to migrate {what}: {e}")))?;
        }
        Ok(())
    }
}

/// Parse an RFC 3339 timestamp column
pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid date: {e}")))
}

/// Whether a write failed on a UNIQUE index
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Whether a write referenced a row that no longer exists
pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Whether a write failed on a CHECK constraint
pub(crate) fn is_check_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_check_violation())
}

/// Column named by a SQLite UNIQUE failure ("UNIQUE constraint failed: users.email")
pub(crate) fn violated_column(error: &sqlx::Error) -> Option<String> {
    let sqlx::Error::Database(db) = error else {
        return None;
    };
    let detail = db.message().split(':').nth(1)?;
    let first = detail.split(',').next()?.trim();
    first.split('.').nth(1).map(str::to_owned)
}
