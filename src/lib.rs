// ABOUTME: Main library entry point for the Foodgram recipe-sharing backend
// ABOUTME: REST API for recipes, tags, ingredients, favourites, subscriptions and shopping lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

#![deny(unsafe_code)]

//! # Foodgram
//!
//! A recipe-sharing backend. Users register, publish recipes with tagged
//! ingredients, favourite recipes, follow other authors and download a
//! shopping list aggregated from the recipes in their cart.
//!
//! ## Architecture
//!
//! - **Models / Database**: `SQLite` through `sqlx`, one `impl Database` block per domain
//! - **Serializers**: wire representations and write-body validation
//! - **Permissions / Middleware**: bearer-token identity plus per-endpoint policies
//! - **Filters / Pagination**: query-string mapping and page windows
//! - **Routes**: explicit per-resource `axum` route tables
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use foodgram::config::ServerConfig;
//! use foodgram::database::Database;
//! use foodgram::resources::ServerResources;
//! use foodgram::server::FoodgramServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let database = Database::connect(&config.database).await?;
//!     let resources = Arc::new(ServerResources::new(database, config));
//!     FoodgramServer::new(resources).run().await?;
//!     Ok(())
//! }
//! ```

/// JWT issue/validation and password hashing
pub mod auth;

/// Environment configuration
pub mod config;

/// Field limits, pagination defaults and shared messages
pub mod constants;

/// `SQLite` storage and schema migrations
pub mod database;

/// Unified error handling
pub mod errors;

/// Recipe list filters and ingredient search ranking
pub mod filters;

/// Structured logging setup
pub mod logging;

/// Recipe image storage
pub mod media;

/// Authentication, CORS and request tracing middleware
pub mod middleware;

/// Domain models
pub mod models;

/// Page-number pagination
pub mod pagination;

/// Roles and access policies
pub mod permissions;

/// Shared server resources
pub mod resources;

/// HTTP routes
pub mod routes;

/// Wire representations and validation
pub mod serializers;

/// Server bootstrap and graceful shutdown
pub mod server;

/// Recipe orchestration and shopping list rendering
pub mod services;
