// ABOUTME: Recipe, tag, ingredient and membership models
// ABOUTME: Includes write drafts, hydrated recipe views and shopping list rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::error_messages;
use crate::models::User;

// ============================================================================
// Reference data
// ============================================================================

/// Recipe label such as "Breakfast"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Tag identifier
    pub id: i64,
    /// Unique display name
    pub name: String,
    /// Unique hex color (`#RRGGBB`)
    pub color: String,
    /// Unique URL-safe identifier used by filters
    pub slug: String,
}

/// Values for a new tag
#[derive(Debug, Clone, Deserialize)]
pub struct NewTag {
    /// Display name
    pub name: String,
    /// Hex color
    pub color: String,
    /// URL-safe identifier
    pub slug: String,
}

/// Partial tag update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagUpdate {
    /// New name
    pub name: Option<String>,
    /// New color
    pub color: Option<String>,
    /// New slug
    pub slug: Option<String>,
}

/// Ingredient with its unit of measure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    /// Ingredient identifier
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Unit, unique together with the name
    pub measurement_unit: String,
}

/// Values for a new ingredient
#[derive(Debug, Clone, Deserialize)]
pub struct NewIngredient {
    /// Ingredient name
    pub name: String,
    /// Unit of measure
    pub measurement_unit: String,
}

// ============================================================================
// Recipes
// ============================================================================

/// Recipe row as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    /// Recipe identifier
    pub id: i64,
    /// Author user id
    pub author_id: i64,
    /// Title
    pub name: String,
    /// Description and instructions
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
    /// Media-relative image path
    pub image: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Ingredient line of a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeIngredient {
    /// Ingredient id
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Unit of measure
    pub measurement_unit: String,
    /// Quantity in this recipe
    pub amount: i64,
}

/// Requested ingredient line on write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    /// Ingredient id
    pub ingredient_id: i64,
    /// Quantity
    pub amount: i64,
}

/// Validated values for a new recipe
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    /// Title
    pub name: String,
    /// Description
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
    /// Stored image path
    pub image: Option<String>,
    /// Tag ids, distinct
    pub tags: Vec<i64>,
    /// Ingredient lines, distinct and non-empty
    pub ingredients: Vec<IngredientAmount>,
}

/// Validated partial update; `tags`/`ingredients` replace the whole set when present
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    /// New title
    pub name: Option<String>,
    /// New description
    pub text: Option<String>,
    /// New cooking time
    pub cooking_time: Option<i64>,
    /// New stored image path
    pub image: Option<String>,
    /// Replacement tag set
    pub tags: Option<Vec<i64>>,
    /// Replacement ingredient set
    pub ingredients: Option<Vec<IngredientAmount>>,
}

/// Recipe hydrated with its relations and the viewer's flags
#[derive(Debug, Clone)]
pub struct RecipeDetail {
    /// Stored row
    pub recipe: Recipe,
    /// Author account
    pub author: User,
    /// Whether the viewer follows the author
    pub author_is_subscribed: bool,
    /// Tags ordered by slug
    pub tags: Vec<Tag>,
    /// Complete ingredient list
    pub ingredients: Vec<RecipeIngredient>,
    /// Viewer has favorited the recipe
    pub is_favorited: bool,
    /// Recipe is in the viewer's cart
    pub is_in_shopping_cart: bool,
}

/// Compact recipe used by memberships and subscription listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeSummary {
    /// Recipe identifier
    pub id: i64,
    /// Title
    pub name: String,
    /// Media-relative image path
    pub image: Option<String>,
    /// Minutes
    pub cooking_time: i64,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

// ============================================================================
// Memberships
// ============================================================================

/// Per-user recipe set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipKind {
    /// Bookmarked recipes
    Favourite,
    /// Recipes queued for the shopping list
    ShoppingCart,
}

impl MembershipKind {
    /// Backing table
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Favourite => "favourites",
            Self::ShoppingCart => "shopping_cart",
        }
    }

    /// Message when adding an existing pair
    #[must_use]
    pub const fn already_present_message(self) -> &'static str {
        match self {
            Self::Favourite => error_messages::ALREADY_FAVORITED,
            Self::ShoppingCart => error_messages::ALREADY_IN_CART,
        }
    }

    /// Message when removing an absent pair
    #[must_use]
    pub const fn absent_message(self) -> &'static str {
        match self {
            Self::Favourite => error_messages::NOT_FAVORITED,
            Self::ShoppingCart => error_messages::NOT_IN_CART,
        }
    }
}

impl Display for MembershipKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Favourite => write!(f, "favourite"),
            Self::ShoppingCart => write!(f, "shopping_cart"),
        }
    }
}

/// Aggregated shopping list line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingListItem {
    /// Ingredient name
    pub name: String,
    /// Unit of measure
    pub measurement_unit: String,
    /// Sum over all carted recipes
    pub total_amount: i64,
}
