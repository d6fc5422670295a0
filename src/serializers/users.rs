// ABOUTME: User, credential and subscription representations and body validation
// ABOUTME: Registration, profile patch, login and set-password bodies with per-field errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{matches_pattern, RecipeSummaryResponse, Validator, REQUIRED};
use crate::constants::{error_messages, limits, reserved};
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserUpdate};

const USERNAME_PATTERN: &str = r"^[\w.@+-]+$";
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

static USERNAME_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static EMAIL_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

// ============================================================================
// Responses
// ============================================================================

/// User as seen by a viewer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    /// Email address
    pub email: String,
    /// User identifier
    pub id: i64,
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Whether the viewer follows this user
    pub is_subscribed: bool,
}

impl UserResponse {
    /// Render `user` with the viewer's subscription flag
    #[must_use]
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// Registration result (no viewer-dependent fields)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCreatedResponse {
    /// Email address
    pub email: String,
    /// User identifier
    pub id: i64,
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl From<User> for UserCreatedResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Followed author with their newest recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    /// Author representation
    #[serde(flatten)]
    pub user: UserResponse,
    /// Author's recipes, newest first, possibly truncated
    pub recipes: Vec<RecipeSummaryResponse>,
    /// Total number of the author's recipes
    pub recipes_count: i64,
}

/// Login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT to send as `Authorization: Token <jwt>`
    pub auth_token: String,
}

// ============================================================================
// Bodies
// ============================================================================

/// Body of `POST /api/users/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterBody {
    /// Email address
    pub email: Option<String>,
    /// Login name
    pub username: Option<String>,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Plain-text password
    pub password: Option<String>,
}

/// Registration values after validation; the password is still plain text
#[derive(Debug, Clone)]
pub struct Registration {
    /// Email address
    pub email: String,
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Plain-text password
    pub password: String,
}

impl RegisterBody {
    /// Validate every registration field
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every invalid or missing field
    pub fn validate(self) -> AppResult<Registration> {
        let mut v = Validator::new();
        let email = v.required_text("email", self.email, limits::MAX_LENGTH_EMAIL);
        let username = v.required_text("username", self.username, limits::MAX_LENGTH_NAME);
        let first_name = v.required_text("first_name", self.first_name, limits::MAX_LENGTH_NAME);
        let last_name = v.required_text("last_name", self.last_name, limits::MAX_LENGTH_NAME);
        let password = check_password(&mut v, "password", self.password);
        check_email(&mut v, email.as_deref())?;
        check_username(&mut v, username.as_deref())?;
        v.finish()?;

        match (email, username, first_name, last_name, password) {
            (Some(email), Some(username), Some(first_name), Some(last_name), Some(password)) => {
                Ok(Registration {
                    email,
                    username,
                    first_name,
                    last_name,
                    password,
                })
            }
            _ => Err(AppError::internal(
                "Registration validation passed without all fields",
            )),
        }
    }
}

/// Body of `PATCH /api/users/me/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatchBody {
    /// New login name
    pub username: Option<String>,
    /// New email address
    pub email: Option<String>,
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
}

impl UserPatchBody {
    /// Validate the supplied fields
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every invalid field
    pub fn validate(self) -> AppResult<UserUpdate> {
        let mut v = Validator::new();
        let update = UserUpdate {
            username: v.optional_text("username", self.username, limits::MAX_LENGTH_NAME),
            email: v.optional_text("email", self.email, limits::MAX_LENGTH_EMAIL),
            first_name: v.optional_text("first_name", self.first_name, limits::MAX_LENGTH_NAME),
            last_name: v.optional_text("last_name", self.last_name, limits::MAX_LENGTH_NAME),
        };
        check_email(&mut v, update.email.as_deref())?;
        check_username(&mut v, update.username.as_deref())?;
        v.finish()?;
        Ok(update)
    }
}

/// Body of `POST /api/auth/token/login/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginBody {
    /// Account email
    pub email: Option<String>,
    /// Plain-text password
    pub password: Option<String>,
}

impl LoginBody {
    /// Both fields must be present
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing field
    pub fn validate(self) -> AppResult<(String, String)> {
        let mut v = Validator::new();
        let email = v.required_text("email", self.email, limits::MAX_LENGTH_EMAIL);
        if self.password.is_none() {
            v.add("password", REQUIRED);
        }
        v.finish()?;

        match (email, self.password) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(AppError::internal("Login validation passed without all fields")),
        }
    }
}

/// Body of `POST /api/users/set_password/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetPasswordBody {
    /// Replacement password
    pub new_password: Option<String>,
    /// Password in use now
    pub current_password: Option<String>,
}

impl SetPasswordBody {
    /// Returns `(new_password, current_password)`
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing field or a weak new password
    pub fn validate(self) -> AppResult<(String, String)> {
        let mut v = Validator::new();
        let new_password = check_password(&mut v, "new_password", self.new_password);
        if self.current_password.is_none() {
            v.add("current_password", REQUIRED);
        }
        v.finish()?;

        match (new_password, self.current_password) {
            (Some(new_password), Some(current)) => Ok((new_password, current)),
            _ => Err(AppError::internal(
                "Password validation passed without all fields",
            )),
        }
    }
}

/// Parse the `recipes_limit` query parameter
///
/// # Errors
///
/// Returns a field error for anything but a non-negative integer
pub fn parse_recipes_limit(raw: Option<&str>) -> AppResult<Option<i64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<u32>()
            .map(|limit| Some(i64::from(limit)))
            .map_err(|_| {
                AppError::field("recipes_limit", "A non-negative integer is required.")
            }),
    }
}

fn check_password(v: &mut Validator, field: &str, value: Option<String>) -> Option<String> {
    let Some(password) = value else {
        v.add(field, REQUIRED);
        return None;
    };
    let length = password.chars().count();
    if length < limits::MIN_PASSWORD_LENGTH {
        v.add(
            field,
            format!(
                "This password is too short. It must contain at least {} characters.",
                limits::MIN_PASSWORD_LENGTH
            ),
        );
        return None;
    }
    // bcrypt only looks at the first 72 bytes
    if password.len() > limits::MAX_PASSWORD_LENGTH {
        v.add(
            field,
            format!(
                "Ensure this password has no more than {} bytes.",
                limits::MAX_PASSWORD_LENGTH
            ),
        );
        return None;
    }
    Some(password)
}

fn check_email(v: &mut Validator, email: Option<&str>) -> AppResult<()> {
    if let Some(email) = email {
        if !matches_pattern(&EMAIL_RE, EMAIL_PATTERN, email)? {
            v.add("email", "Enter a valid email address.");
        }
    }
    Ok(())
}

fn check_username(v: &mut Validator, username: Option<&str>) -> AppResult<()> {
    let Some(username) = username else {
        return Ok(());
    };
    if username.eq_ignore_ascii_case(reserved::USERNAME_ME) {
        v.add("username", error_messages::USERNAME_RESERVED);
    } else if !matches_pattern(&USERNAME_RE, USERNAME_PATTERN, username)? {
        v.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
    Ok(())
}
