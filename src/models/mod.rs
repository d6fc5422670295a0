// ABOUTME: Domain models for users, recipes, reference data and memberships
// ABOUTME: Plain data types shared by the database, serializer and route layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! # Data Models
//!
//! Storage-shaped types. Wire representations live in `serializers`; viewer
//! dependent flags (`is_favorited`, `is_subscribed`) are filled in by the
//! database layer when a recipe is hydrated.

/// Recipes, tags, ingredients and membership kinds
pub mod recipe;
/// Accounts
pub mod user;

pub use recipe::{
    Ingredient, IngredientAmount, MembershipKind, NewIngredient, NewTag, Recipe, RecipeDetail,
    RecipeDraft, RecipeIngredient, RecipePatch, RecipeSummary, ShoppingListItem, Tag, TagUpdate,
};
pub use user::{NewUser, User, UserUpdate};
