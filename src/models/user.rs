// ABOUTME: User account and subscription models
// ABOUTME: Accounts carry a role; subscriptions link a follower to an author
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::permissions::UserRole;

/// Registered account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique user identifier
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Unique email address, used for token login
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account role
    pub role: UserRole,
    /// Inactive accounts cannot log in
    pub is_active: bool,
    /// Registration time
    pub date_joined: DateTime<Utc>,
}

/// Values for a new account; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash
    pub password_hash: String,
    /// Account role
    pub role: UserRole,
}

/// Partial profile update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New login name
    pub username: Option<String>,
    /// New email address
    pub email: Option<String>,
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
}

impl UserUpdate {
    /// Whether no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }
}
