// ABOUTME: Tag and ingredient representations and tag write validation
// ABOUTME: Enforces hex color and slug formats plus field length limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{matches_pattern, Validator};
use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::models::{Ingredient, NewTag, Tag, TagUpdate};

const COLOR_PATTERN: &str = r"^#[0-9a-fA-F]{3,6}$";
const SLUG_PATTERN: &str = r"^[-a-zA-Z0-9_]+$";

static COLOR_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static SLUG_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

/// Tag as rendered in every response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagResponse {
    /// Tag identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Hex color
    pub color: String,
    /// URL-safe identifier
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

/// Ingredient as rendered by the ingredient endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientResponse {
    /// Ingredient identifier
    pub id: i64,
    /// Name
    pub name: String,
    /// Unit of measure
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Body of `POST /api/tags/` and `PATCH /api/tags/{id}/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagWriteBody {
    /// Display name
    pub name: Option<String>,
    /// Hex color
    pub color: Option<String>,
    /// URL-safe identifier
    pub slug: Option<String>,
}

impl TagWriteBody {
    /// Validate a full tag for creation
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every invalid or missing field
    pub fn validate_create(self) -> AppResult<NewTag> {
        let mut v = Validator::new();
        let name = v.required_text("name", self.name, limits::MAX_LENGTH_NAME_TAG);
        let color = v.required_text("color", self.color, limits::MAX_LENGTH_COLOR_TAG);
        let slug = v.required_text("slug", self.slug, limits::MAX_LENGTH_SLUG_TAG);
        check_formats(&mut v, color.as_deref(), slug.as_deref())?;
        v.finish()?;

        match (name, color, slug) {
            (Some(name), Some(color), Some(slug)) => Ok(NewTag { name, color, slug }),
            _ => Err(AppError::internal("Tag validation passed without all fields")),
        }
    }

    /// Validate a partial tag update
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every invalid field
    pub fn validate_update(self) -> AppResult<TagUpdate> {
        let mut v = Validator::new();
        let name = v.optional_text("name", self.name, limits::MAX_LENGTH_NAME_TAG);
        let color = v.optional_text("color", self.color, limits::MAX_LENGTH_COLOR_TAG);
        let slug = v.optional_text("slug", self.slug, limits::MAX_LENGTH_SLUG_TAG);
        check_formats(&mut v, color.as_deref(), slug.as_deref())?;
        v.finish()?;

        Ok(TagUpdate { name, color, slug })
    }
}

fn check_formats(v: &mut Validator, color: Option<&str>, slug: Option<&str>) -> AppResult<()> {
    if let Some(color) = color {
        if !matches_pattern(&COLOR_RE, COLOR_PATTERN, color)? {
            v.add("color", "Enter a valid hex color such as #E26C2D.");
        }
    }
    if let Some(slug) = slug {
        if !matches_pattern(&SLUG_RE, SLUG_PATTERN, slug)? {
            v.add(
                "slug",
                "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
            );
        }
    }
    Ok(())
}
