// ABOUTME: Wire representations and write-body validation for the REST API
// ABOUTME: Shared helpers collect per-field messages into a single validation error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! # Serializers
//!
//! Response structs are built from models plus viewer-dependent flags. Write
//! bodies deserialize with every field optional so that missing fields are
//! reported per field (`{"name": ["This field is required."]}`) instead of as
//! a JSON rejection.

/// Recipe, ingredient line and summary representations
pub mod recipes;
/// Tag and ingredient reference data
pub mod reference;
/// Accounts, credentials and subscriptions
pub mod users;

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{AppError, AppResult, FieldErrors};

pub use recipes::{RecipeResponse, RecipeSummaryResponse, RecipeWriteBody};
pub use reference::{IngredientResponse, TagResponse, TagWriteBody};
pub use users::{
    LoginBody, RegisterBody, SetPasswordBody, SubscriptionResponse, TokenResponse,
    UserCreatedResponse, UserPatchBody, UserResponse,
};

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";

/// Accumulates field messages while validating a body
#[derive(Debug, Default)]
pub(crate) struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Required, trimmed, non-blank string with a maximum length in characters
    pub(crate) fn required_text(
        &mut self,
        field: &str,
        value: Option<String>,
        max_len: usize,
    ) -> Option<String> {
        match value {
            None => {
                self.add(field, REQUIRED);
                None
            }
            Some(value) => self.optional_text(field, Some(value), max_len),
        }
    }

    /// Present-but-invalid strings are reported; absent ones are fine
    pub(crate) fn optional_text(
        &mut self,
        field: &str,
        value: Option<String>,
        max_len: usize,
    ) -> Option<String> {
        let value = value?.trim().to_owned();
        if value.is_empty() {
            self.add(field, BLANK);
            return None;
        }
        if value.chars().count() > max_len {
            self.add(
                field,
                format!("Ensure this field has no more than {max_len} characters."),
            );
            return None;
        }
        Some(value)
    }

    pub(crate) fn in_range(&mut self, field: &str, value: i64, min: i64, max: i64) -> bool {
        if value < min {
            self.add(
                field,
                format!("Ensure this value is greater than or equal to {min}."),
            );
            false
        } else if value > max {
            self.add(
                field,
                format!("Ensure this value is less than or equal to {max}."),
            );
            false
        } else {
            true
        }
    }

    /// `Ok(())` when no messages were collected
    pub(crate) fn finish(self) -> AppResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.errors))
        }
    }
}

/// Compile-once regex match
pub(crate) fn matches_pattern(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    pattern: &str,
    value: &str,
) -> AppResult<bool> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map(|re| re.is_match(value))
        .map_err(|e| AppError::internal(format!("Invalid validation pattern {pattern}: {e}")))
}
