// ABOUTME: Access policies applied as an explicit check step by every handler
// ABOUTME: AllowAny, Authenticated, AdminOrReadOnly and AuthorOrStaffOrReadOnly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use http::Method;

use crate::errors::{AppError, AppResult};
use crate::middleware::auth::AuthResult;

/// Who may call an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Anyone, authenticated or not
    AllowAny,
    /// Any authenticated identity
    Authenticated,
    /// Reads are public, writes need an admin
    AdminOrReadOnly,
    /// Reads are public, creating needs an identity, modifying needs the
    /// author or a staff member
    AuthorOrStaffOrReadOnly,
}

/// GET, HEAD and OPTIONS
#[must_use]
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

impl AccessPolicy {
    /// Request-level check, before any object is loaded
    ///
    /// # Errors
    ///
    /// Returns 401 when an identity is required but missing, 403 when the
    /// identity lacks the privilege
    pub fn check_request(self, method: &Method, auth: Option<&AuthResult>) -> AppResult<()> {
        match self {
            Self::AllowAny => Ok(()),
            Self::Authenticated => auth.map(|_| ()).ok_or_else(AppError::auth_required),
            Self::AdminOrReadOnly => {
                if is_safe_method(method) {
                    return Ok(());
                }
                let auth = auth.ok_or_else(AppError::auth_required)?;
                if auth.is_admin() {
                    Ok(())
                } else {
                    Err(AppError::permission_denied(
                        "Only administrators may change reference data",
                    ))
                }
            }
            Self::AuthorOrStaffOrReadOnly => {
                if is_safe_method(method) {
                    return Ok(());
                }
                auth.map(|_| ()).ok_or_else(AppError::auth_required)
            }
        }
    }

    /// Object-level check against the recipe author
    ///
    /// # Errors
    ///
    /// Returns 401/403 as `check_request`, plus 403 when a non-staff identity
    /// modifies someone else's object
    pub fn check_object(
        self,
        method: &Method,
        auth: Option<&AuthResult>,
        author_id: i64,
    ) -> AppResult<()> {
        self.check_request(method, auth)?;
        if self != Self::AuthorOrStaffOrReadOnly || is_safe_method(method) {
            return Ok(());
        }

        match auth {
            Some(auth) if auth.user_id == author_id || auth.is_staff() => Ok(()),
            Some(_) => Err(AppError::permission_denied(
                "Only the author or staff may modify this recipe",
            )),
            None => Err(AppError::auth_required()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::UserRole;

    fn identity(user_id: i64, role: UserRole) -> AuthResult {
        AuthResult {
            user_id,
            role,
            email: format!("user{user_id}@example.com"),
        }
    }

    #[test]
    fn test_reads_are_public() {
        for policy in [
            AccessPolicy::AllowAny,
            AccessPolicy::AdminOrReadOnly,
            AccessPolicy::AuthorOrStaffOrReadOnly,
        ] {
            assert!(policy.check_request(&Method::GET, None).is_ok());
        }
        let err = AccessPolicy::Authenticated
            .check_request(&Method::GET, None)
            .unwrap_err();
        assert_eq!(err.http_status(), 401);
    }

    #[test]
    fn test_admin_or_read_only() {
        let user = identity(1, UserRole::User);
        let moderator = identity(2, UserRole::Moderator);
        let admin = identity(3, UserRole::Admin);

        let policy = AccessPolicy::AdminOrReadOnly;
        assert_eq!(
            policy.check_request(&Method::POST, None).unwrap_err().http_status(),
            401
        );
        assert_eq!(
            policy
                .check_request(&Method::POST, Some(&user))
                .unwrap_err()
                .http_status(),
            403
        );
        assert!(policy.check_request(&Method::POST, Some(&moderator)).is_err());
        assert!(policy.check_request(&Method::DELETE, Some(&admin)).is_ok());
    }

    #[test]
    fn test_author_or_staff() {
        let author = identity(1, UserRole::User);
        let stranger = identity(2, UserRole::User);
        let moderator = identity(3, UserRole::Moderator);
        let policy = AccessPolicy::AuthorOrStaffOrReadOnly;

        assert!(policy.check_request(&Method::POST, Some(&stranger)).is_ok());
        assert!(policy.check_object(&Method::PATCH, Some(&author), 1).is_ok());
        assert!(policy.check_object(&Method::DELETE, Some(&moderator), 1).is_ok());
        assert!(policy.check_object(&Method::GET, None, 1).is_ok());
        assert_eq!(
            policy
                .check_object(&Method::PATCH, Some(&stranger), 1)
                .unwrap_err()
                .http_status(),
            403
        );
        assert_eq!(
            policy
                .check_object(&Method::DELETE, None, 1)
                .unwrap_err()
                .http_status(),
            401
        );
    }
}
