// ABOUTME: Credential flow: registration, token login and password change
// ABOUTME: AuthService holds the logic; AuthRoutes exposes POST /api/auth/token/login/
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::{info, warn};

use super::extract::json_body;
use crate::auth::{hash_password, verify_password};
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::permissions::UserRole;
use crate::resources::ServerResources;
use crate::serializers::{users::Registration, LoginBody, TokenResponse};

/// Field that carries errors not tied to one input
const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Account and credential operations
pub struct AuthService<'a> {
    resources: &'a ServerResources,
}

impl<'a> AuthService<'a> {
    /// Create a service over the shared resources
    #[must_use]
    pub const fn new(resources: &'a ServerResources) -> Self {
        Self { resources }
    }

    /// Register a regular account
    ///
    /// # Errors
    ///
    /// Returns a conflict when the username or email is taken
    pub async fn register(&self, registration: Registration) -> AppResult<User> {
        let password_hash =
            hash_password(registration.password, self.resources.config.auth.bcrypt_cost).await?;

        let user = self
            .resources
            .database
            .create_user(&NewUser {
                username: registration.username,
                email: registration.email,
                first_name: registration.first_name,
                last_name: registration.last_name,
                password_hash,
                role: UserRole::User,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Exchange email and password for a token
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for an unknown email, a wrong password or an
    /// inactive account, without saying which
    pub async fn login(&self, email: &str, password: String) -> AppResult<String> {
        let Some(user) = self.resources.database.get_user_by_email(email).await? else {
            warn!("Login failed: unknown email");
            return Err(invalid_credentials());
        };

        if !verify_password(password, user.password_hash.clone()).await? {
            warn!(user_id = user.id, "Login failed: wrong password");
            return Err(invalid_credentials());
        }
        if !user.is_active {
            warn!(user_id = user.id, "Login failed: inactive account");
            return Err(invalid_credentials());
        }

        let token = self.resources.auth_manager.generate_token(&user)?;
        info!(user_id = user.id, "User logged in");
        Ok(token)
    }

    /// Replace the password after checking the current one
    ///
    /// # Errors
    ///
    /// Returns a field error on `current_password` when it does not match
    pub async fn set_password(
        &self,
        user_id: i64,
        new_password: String,
        current_password: String,
    ) -> AppResult<()> {
        let user = self.resources.database.get_user_required(user_id).await?;
        if !verify_password(current_password, user.password_hash).await? {
            return Err(AppError::field(
                "current_password",
                error_messages::WRONG_CURRENT_PASSWORD,
            ));
        }

        let password_hash =
            hash_password(new_password, self.resources.config.auth.bcrypt_cost).await?;
        self.resources
            .database
            .set_password_hash(user_id, &password_hash)
            .await?;

        info!(user_id, "Password changed");
        Ok(())
    }
}

fn invalid_credentials() -> AppError {
    AppError::field(NON_FIELD_ERRORS, error_messages::INVALID_CREDENTIALS)
}

/// Token login routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/token/login/", post(Self::handle_login))
            .with_state(resources)
    }

    /// Handle POST /api/auth/token/login/
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<LoginBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let (email, password) = json_body(payload)?.validate()?;
        let auth_token = AuthService::new(&resources).login(&email, password).await?;
        Ok((StatusCode::OK, Json(TokenResponse { auth_token })).into_response())
    }
}
