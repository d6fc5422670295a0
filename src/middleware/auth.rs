// ABOUTME: Request authentication from the Authorization header
// ABOUTME: Validates HS256 JWTs (Bearer or Token scheme) and resolves the active account
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use http::header::AUTHORIZATION;
use http::HeaderMap;
use tracing::{debug, warn};

use crate::auth::AuthManager;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::permissions::UserRole;

/// Authenticated identity passed explicitly to handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// Account id
    pub user_id: i64,
    /// Role at the time of the request
    pub role: UserRole,
    /// Account email
    pub email: String,
}

impl AuthResult {
    /// Moderator or admin
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Admin only
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Resolves identities from request headers
#[derive(Clone, Debug)]
pub struct AuthMiddleware {
    auth_manager: AuthManager,
    database: Database,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub const fn new(auth_manager: AuthManager, database: Database) -> Self {
        Self {
            auth_manager,
            database,
        }
    }

    /// Resolve the identity if an `Authorization` header is present
    ///
    /// A missing header is anonymous; a present but invalid header is an error.
    ///
    /// # Errors
    ///
    /// Returns an auth error for a malformed, expired or forged token, or
    /// when the account no longer exists or is inactive
    #[tracing::instrument(
        skip(self, headers),
        fields(auth_method = tracing::field::Empty, user_id = tracing::field::Empty)
    )]
    pub async fn authenticate_optional(&self, headers: &HeaderMap) -> AppResult<Option<AuthResult>> {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return Ok(None);
        };
        let header = value
            .to_str()
            .map_err(|_| AppError::auth_invalid("Authorization header is not valid ASCII"))?;

        // Security: never log the token itself
        let token = if let Some(token) = header.strip_prefix("Bearer ") {
            tracing::Span::current().record("auth_method", "bearer");
            token
        } else if let Some(token) = header.strip_prefix("Token ") {
            tracing::Span::current().record("auth_method", "token");
            token
        } else {
            warn!("Authentication failed: unsupported authorization scheme");
            return Err(AppError::auth_invalid(
                "Invalid authorization header format - must be 'Bearer <token>' or 'Token <token>'",
            ));
        };

        let result = self.authenticate_token(token.trim()).await?;
        tracing::Span::current().record("user_id", result.user_id);
        debug!(user_id = result.user_id, "Request authenticated");
        Ok(Some(result))
    }

    /// Resolve the identity, failing when the request is anonymous
    ///
    /// # Errors
    ///
    /// Returns `AUTH_REQUIRED` without a header, or the errors of
    /// `authenticate_optional`
    pub async fn authenticate_request(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        self.authenticate_optional(headers)
            .await?
            .ok_or_else(AppError::auth_required)
    }

    async fn authenticate_token(&self, token: &str) -> AppResult<AuthResult> {
        let claims = self.auth_manager.validate_token(token)?;
        let user_id = claims.user_id()?;

        let user = self
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Token user no longer exists"))?;

        if !user.is_active {
            return Err(AppError::auth_invalid("User account is inactive"));
        }

        Ok(AuthResult {
            user_id: user.id,
            role: user.role,
            email: user.email,
        })
    }
}
