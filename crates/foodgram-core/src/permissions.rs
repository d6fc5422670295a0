// ABOUTME: User roles and the permission flags each role grants
// ABOUTME: Staff (moderator/admin) may moderate recipes; admins manage reference data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

bitflags! {
    /// Capabilities granted to an authenticated identity
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Permissions: u32 {
        /// Read public resources
        const READ = 1;
        /// Create recipes and manage own memberships
        const CREATE_RECIPES = 1 << 1;
        /// Modify or delete recipes authored by others
        const MODERATE_RECIPES = 1 << 2;
        /// Create, modify and delete tags and ingredients
        const MANAGE_REFERENCE_DATA = 1 << 3;
        /// Administer user accounts
        const MANAGE_USERS = 1 << 4;
    }
}

/// Account role stored on each user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular account
    #[default]
    User,
    /// May moderate content of other users
    Moderator,
    /// Full control
    Admin,
}

impl UserRole {
    /// Permission flags granted by this role
    #[must_use]
    pub const fn permissions(self) -> Permissions {
        match self {
            Self::User => Permissions::READ.union(Permissions::CREATE_RECIPES),
            Self::Moderator => Permissions::READ
                .union(Permissions::CREATE_RECIPES)
                .union(Permissions::MODERATE_RECIPES),
            Self::Admin => Permissions::all(),
        }
    }

    /// Moderator or admin
    #[must_use]
    pub const fn is_staff(self) -> bool {
        self.permissions().contains(Permissions::MODERATE_RECIPES)
    }

    /// Admin only
    #[must_use]
    pub const fn is_admin(self) -> bool {
        self.permissions().contains(Permissions::MANAGE_REFERENCE_DATA)
    }

    /// Database and wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(AppError::invalid_input(format!("Unknown user role: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(!UserRole::User
            .permissions()
            .contains(Permissions::MODERATE_RECIPES));
        assert!(UserRole::Moderator
            .permissions()
            .contains(Permissions::MODERATE_RECIPES));
        assert!(!UserRole::Moderator
            .permissions()
            .contains(Permissions::MANAGE_REFERENCE_DATA));
        assert!(UserRole::Admin
            .permissions()
            .contains(Permissions::MANAGE_REFERENCE_DATA | Permissions::MODERATE_RECIPES));
    }

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::User, UserRole::Moderator, UserRole::Admin] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_staff() {
        assert!(!UserRole::User.is_staff());
        assert!(UserRole::Moderator.is_staff());
        assert!(UserRole::Admin.is_staff());
        assert!(!UserRole::Moderator.is_admin());
    }
}
