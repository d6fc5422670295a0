// ABOUTME: Query-string filters for recipe and ingredient listings
// ABOUTME: Parses repeated author/tag params and boolean membership flags into a typed filter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use serde::Deserialize;

use crate::errors::{AppError, AppResult};

/// Raw recipe list query; repeated keys (`?tags=a&tags=b`) collect into vectors
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    /// Author ids
    #[serde(default)]
    pub author: Vec<String>,
    /// Tag slugs
    #[serde(default)]
    pub tags: Vec<String>,
    /// `1/0/true/false`
    pub is_favorited: Option<String>,
    /// `1/0/true/false`
    pub is_in_shopping_cart: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
}

/// Typed recipe filter applied by the database layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Recipes by any of these authors
    pub authors: Vec<i64>,
    /// Recipes having any of these tag slugs
    pub tags: Vec<String>,
    /// Keep (`true`) or drop (`false`) the viewer's favourites
    pub is_favorited: Option<bool>,
    /// Keep (`true`) or drop (`false`) recipes in the viewer's cart
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeFilter {
    /// Build a filter from the raw query
    ///
    /// # Errors
    ///
    /// Returns a field error for a non-numeric author id or an unrecognized flag value
    pub fn from_query(query: &RecipeListQuery) -> AppResult<Self> {
        let authors = query
            .author
            .iter()
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| AppError::field("author", format!("Invalid author id: {value}")))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let mut tags: Vec<String> = query
            .tags
            .iter()
            .map(|slug| slug.trim().to_owned())
            .filter(|slug| !slug.is_empty())
            .collect();
        tags.sort();
        tags.dedup();

        Ok(Self {
            authors,
            tags,
            is_favorited: parse_flag("is_favorited", query.is_favorited.as_deref())?,
            is_in_shopping_cart: parse_flag(
                "is_in_shopping_cart",
                query.is_in_shopping_cart.as_deref(),
            )?,
        })
    }
}

/// Parse a boolean query flag; empty or absent means "not filtered"
///
/// # Errors
///
/// Returns a field error for values other than `1/0/true/false`
pub fn parse_flag(field: &str, value: Option<&str>) -> AppResult<Option<bool>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(v) if v == "0" || v.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(v) => Err(AppError::field(
            field,
            format!("Expected 1, 0, true or false, got '{v}'"),
        )),
    }
}

/// Ingredient search query
#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    /// Case-insensitive name fragment
    pub name: Option<String>,
}

/// SQL `LIKE` patterns (escape character `\`) that prefilter a name search
///
/// SQLite only folds ASCII case, so the fragment is also tried lowercased,
/// uppercased and capitalized. [`rank_by_name`] makes the final decision.
pub fn name_search_patterns(query: &str) -> Vec<String> {
    let fragment = query.trim();
    if fragment.is_empty() {
        return Vec::new();
    }

    let mut chars = fragment.chars();
    let capitalized: String = chars
        .next()
        .map(|first| {
            first
                .to_uppercase()
                .chain(chars.as_str().to_lowercase().chars())
                .collect()
        })
        .unwrap_or_default();

    let mut patterns = Vec::new();
    for variant in [
        fragment.to_owned(),
        fragment.to_lowercase(),
        fragment.to_uppercase(),
        capitalized,
    ] {
        let pattern = format!("%{}%", escape_like(&variant));
        if !patterns.contains(&pattern) {
            patterns.push(pattern);
        }
    }
    patterns
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Order ingredient names for a search: prefix matches first, then other
/// substring matches; input order is preserved inside each group
pub fn rank_by_name<T>(items: Vec<T>, query: &str, name: impl Fn(&T) -> &str) -> Vec<T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }

    let mut prefix = Vec::new();
    let mut contains = Vec::new();
    for item in items {
        let haystack = name(&item).to_lowercase();
        if haystack.starts_with(&needle) {
            prefix.push(item);
        } else if haystack.contains(&needle) {
            contains.push(item);
        }
    }
    prefix.extend(contains);
    prefix
}
