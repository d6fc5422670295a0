// ABOUTME: Centralized resource container shared by every HTTP handler
// ABOUTME: Holds the database pool, token manager, auth middleware, media storage and config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! # Server Resources
//!
//! Built once at start-up and handed to the router as `Arc<ServerResources>`
//! state. Cloning the inner handles is cheap: the pool and the token keys are
//! reference counted.

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::media::MediaStorage;
use crate::middleware::AuthMiddleware;

/// Shared server resources
#[derive(Clone, Debug)]
pub struct ServerResources {
    /// Storage
    pub database: Arc<Database>,
    /// JWT issue and validation
    pub auth_manager: Arc<AuthManager>,
    /// Bearer token to identity resolution
    pub auth_middleware: Arc<AuthMiddleware>,
    /// Recipe image files
    pub media: Arc<MediaStorage>,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Wire resources together from an open database and loaded config
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        let auth_manager = AuthManager::new(
            config.auth.jwt_secret.as_bytes(),
            i64::try_from(config.auth.jwt_expiry_hours).unwrap_or(i64::MAX),
        );
        let auth_middleware = AuthMiddleware::new(auth_manager.clone(), database.clone());
        let media = MediaStorage::new(&config.media);

        Self {
            database: Arc::new(database),
            auth_manager: Arc::new(auth_manager),
            auth_middleware: Arc::new(auth_middleware),
            media: Arc::new(media),
            config: Arc::new(config),
        }
    }
}
