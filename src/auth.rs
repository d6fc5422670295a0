// ABOUTME: JWT-based user authentication and password hashing
// ABOUTME: Issues and validates HS256 tokens and runs bcrypt on the blocking pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! # Authentication
//!
//! Tokens are stateless HS256 JWTs carrying the user id and role. Passwords
//! are stored as bcrypt hashes; hashing and verification are CPU-bound and
//! run through `spawn_blocking` so they never stall the async executor.

use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tokio::task;

use crate::constants::service_names;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::permissions::UserRole;

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature or claims are invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => write!(
                f,
                "JWT token expired at {}",
                expired_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::TokenInvalid { reason } => write!(f, "JWT token is invalid: {reason}"),
            Self::TokenMalformed { details } => write!(f, "JWT token is malformed: {details}"),
        }
    }
}

impl std::error::Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            other => Self::auth_invalid(other.to_string()),
        }
    }
}

/// `JWT` claims for user authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Role at issue time
    pub role: UserRole,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Audience (who the token is intended for)
    pub aud: String,
}

impl Claims {
    /// Numeric user id carried in `sub`
    ///
    /// # Errors
    ///
    /// Returns an auth error if `sub` is not a valid id
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::auth_invalid("Token subject is not a valid user id"))
    }
}

/// Authentication manager for `JWT` tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthManager")
            .field("token_expiry_hours", &self.token_expiry_hours)
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    /// Create a new authentication manager from a shared secret
    #[must_use]
    pub fn new(secret: &[u8], token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours,
        }
    }

    /// Token lifetime in hours
    #[must_use]
    pub const fn token_expiry_hours(&self) -> i64 {
        self.token_expiry_hours
    }

    /// Generate a `JWT` token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            aud: service_names::JWT_AUDIENCE.to_owned(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a detailed error if the token is expired, tampered with or malformed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_audience(&[service_names::JWT_AUDIENCE]);

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(Self::convert_jwt_error(token, &e)),
        }
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(token: &str, e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;
        tracing::debug!("JWT token validation failed: {:?}", e);

        match e.kind() {
            ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
                expired_at: Self::peek_expiry(token).unwrap_or_else(Utc::now),
            },
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidAudience => JwtValidationError::TokenInvalid {
                reason: "Token was issued for a different audience".into(),
            },
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                JwtValidationError::TokenMalformed {
                    details: "Token format is invalid".into(),
                }
            }
            _ => JwtValidationError::TokenInvalid {
                reason: e.to_string(),
            },
        }
    }

    /// Read `exp` from an unverified token for error reporting
    fn peek_expiry(token: &str) -> Option<DateTime<Utc>> {
        let payload = token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
        DateTime::from_timestamp(value.get("exp")?.as_i64()?, 0)
    }
}

/// Generate a random 64-byte signing secret, base64 encoded
#[must_use]
pub fn generate_jwt_secret() -> String {
    let mut bytes = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a password with bcrypt on the blocking pool
///
/// # Errors
///
/// Returns an internal error if hashing fails
pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))
}

/// Verify a password against a bcrypt hash on the blocking pool
///
/// # Errors
///
/// Returns an internal error if the task panics or the hash is corrupt
pub async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verification error: {e}")))
}
