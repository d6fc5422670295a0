// ABOUTME: Recipe representations and recipe write-body validation
// ABOUTME: Builds full and summary views and checks ingredients, tags and cooking time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{TagResponse, UserResponse, Validator, REQUIRED};
use crate::constants::{error_messages, limits};
use crate::errors::{AppError, AppResult};
use crate::media::MediaStorage;
use crate::models::{
    IngredientAmount, RecipeDetail, RecipeDraft, RecipeIngredient, RecipePatch, RecipeSummary,
};

// ============================================================================
// Responses
// ============================================================================

/// Ingredient line inside a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeIngredientResponse {
    /// Ingredient id
    pub id: i64,
    /// Name
    pub name: String,
    /// Unit of measure
    pub measurement_unit: String,
    /// Quantity
    pub amount: i64,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(line: RecipeIngredient) -> Self {
        Self {
            id: line.id,
            name: line.name,
            measurement_unit: line.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Full recipe representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// Recipe identifier
    pub id: i64,
    /// Tags ordered by slug
    pub tags: Vec<TagResponse>,
    /// Author as seen by the viewer
    pub author: UserResponse,
    /// Every ingredient line
    pub ingredients: Vec<RecipeIngredientResponse>,
    /// Viewer favorited the recipe
    pub is_favorited: bool,
    /// Recipe is in the viewer's cart
    pub is_in_shopping_cart: bool,
    /// Title
    pub name: String,
    /// Public image URL
    pub image: Option<String>,
    /// Description
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
}

impl RecipeResponse {
    /// Render a hydrated recipe
    #[must_use]
    pub fn new(detail: RecipeDetail, media: &MediaStorage) -> Self {
        let recipe = detail.recipe;
        Self {
            id: recipe.id,
            tags: detail.tags.into_iter().map(Into::into).collect(),
            author: UserResponse::new(detail.author, detail.author_is_subscribed),
            ingredients: detail.ingredients.into_iter().map(Into::into).collect(),
            is_favorited: detail.is_favorited,
            is_in_shopping_cart: detail.is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image.map(|path| media.url(&path)),
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Compact recipe used by favourites, cart and subscriptions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeSummaryResponse {
    /// Recipe identifier
    pub id: i64,
    /// Title
    pub name: String,
    /// Public image URL
    pub image: Option<String>,
    /// Minutes
    pub cooking_time: i64,
}

impl RecipeSummaryResponse {
    /// Render a summary with its public image URL
    #[must_use]
    pub fn new(summary: RecipeSummary, media: &MediaStorage) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            image: summary.image.map(|path| media.url(&path)),
            cooking_time: summary.cooking_time,
        }
    }
}

// ============================================================================
// Write body
// ============================================================================

/// Requested ingredient line
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IngredientAmountBody {
    /// Ingredient id
    pub id: i64,
    /// Quantity
    pub amount: i64,
}

/// Body of `POST /api/recipes/` and `PATCH /api/recipes/{id}/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeWriteBody {
    /// Ingredient lines
    pub ingredients: Option<Vec<IngredientAmountBody>>,
    /// Tag ids
    pub tags: Option<Vec<i64>>,
    /// Base64 data URI
    pub image: Option<String>,
    /// Title
    pub name: Option<String>,
    /// Description
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i64>,
}

impl RecipeWriteBody {
    /// Validate a new recipe
    ///
    /// Returns the draft (with `image` unset) and the raw image data URI, if
    /// any, for the caller to store.
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every invalid or missing field
    pub fn validate_create(self) -> AppResult<(RecipeDraft, Option<String>)> {
        let mut v = Validator::new();
        let name = v.required_text("name", self.name, limits::MAX_LENGTH_NAME_RECIPE);
        let text = v.required_text("text", self.text, usize::MAX);
        let cooking_time = match self.cooking_time {
            None => {
                v.add("cooking_time", REQUIRED);
                None
            }
            Some(value) => check_cooking_time(&mut v, value),
        };
        let ingredients = match self.ingredients {
            None => {
                v.add("ingredients", REQUIRED);
                None
            }
            Some(lines) => check_ingredients(&mut v, &lines),
        };
        let tags = check_tags(&mut v, self.tags.unwrap_or_default());
        let image = non_empty(self.image);
        v.finish()?;

        match (name, text, cooking_time, ingredients, tags) {
            (Some(name), Some(text), Some(cooking_time), Some(ingredients), Some(tags)) => Ok((
                RecipeDraft {
                    name,
                    text,
                    cooking_time,
                    image: None,
                    tags,
                    ingredients,
                },
                image,
            )),
            _ => Err(AppError::internal(
                "Recipe validation passed without all fields",
            )),
        }
    }

    /// Validate a partial update
    ///
    /// Returns the patch (with `image` unset) and the raw image data URI, if
    /// a new image was supplied.
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every invalid field; a supplied
    /// empty ingredient list is invalid
    pub fn validate_update(self) -> AppResult<(RecipePatch, Option<String>)> {
        let mut v = Validator::new();
        let name = v.optional_text("name", self.name, limits::MAX_LENGTH_NAME_RECIPE);
        let text = v.optional_text("text", self.text, usize::MAX);
        let cooking_time = self
            .cooking_time
            .and_then(|value| check_cooking_time(&mut v, value));
        let ingredients = self
            .ingredients
            .and_then(|lines| check_ingredients(&mut v, &lines));
        let tags = self.tags.and_then(|tags| check_tags(&mut v, tags));
        let image = non_empty(self.image);
        v.finish()?;

        Ok((
            RecipePatch {
                name,
                text,
                cooking_time,
                image: None,
                tags,
                ingredients,
            },
            image,
        ))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn check_cooking_time(v: &mut Validator, value: i64) -> Option<i64> {
    v.in_range(
        "cooking_time",
        value,
        limits::MIN_COOKING_TIME,
        limits::MAX_COOKING_TIME,
    )
    .then_some(value)
}

fn check_ingredients(
    v: &mut Validator,
    lines: &[IngredientAmountBody],
) -> Option<Vec<IngredientAmount>> {
    if lines.is_empty() {
        v.add("ingredients", error_messages::INGREDIENTS_REQUIRED);
        return None;
    }

    let mut seen = HashSet::new();
    let mut valid = true;
    for line in lines {
        if !seen.insert(line.id) {
            v.add("ingredients", error_messages::DUPLICATE_INGREDIENT);
            valid = false;
            break;
        }
    }
    for line in lines {
        if !v.in_range("ingredients", line.amount, limits::MIN_AMOUNT, limits::MAX_AMOUNT) {
            valid = false;
            break;
        }
    }

    valid.then(|| {
        lines
            .iter()
            .map(|line| IngredientAmount {
                ingredient_id: line.id,
                amount: line.amount,
            })
            .collect()
    })
}

fn check_tags(v: &mut Validator, tags: Vec<i64>) -> Option<Vec<i64>> {
    let mut seen = HashSet::new();
    if tags.iter().all(|id| seen.insert(*id)) {
        Some(tags)
    } else {
        v.add("tags", error_messages::DUPLICATE_TAG);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i64, amount: i64) -> IngredientAmountBody {
        IngredientAmountBody { id, amount }
    }

    fn body() -> RecipeWriteBody {
        RecipeWriteBody {
            ingredients: Some(vec![line(1, 2), line(2, 3)]),
            tags: Some(vec![1, 2]),
            image: None,
            name: Some("Borscht".to_owned()),
            text: Some("Boil beets.".to_owned()),
            cooking_time: Some(90),
        }
    }

    fn field_errors(body: RecipeWriteBody) -> crate::errors::FieldErrors {
        body.validate_create().unwrap_err().field_errors().unwrap()
    }

    #[test]
    fn test_valid_create() {
        let (draft, image) = body().validate_create().unwrap();
        assert_eq!(draft.ingredients.len(), 2);
        assert_eq!(draft.ingredients[1].amount, 3);
        assert_eq!(draft.tags, vec![1, 2]);
        assert!(image.is_none());
    }

    #[test]
    fn test_tags_default_to_empty() {
        let (draft, _) = RecipeWriteBody {
            tags: None,
            ..body()
        }
        .validate_create()
        .unwrap();
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn test_ingredient_rules() {
        let errors = field_errors(RecipeWriteBody {
            ingredients: Some(Vec::new()),
            ..body()
        });
        assert_eq!(
            errors["ingredients"],
            vec![error_messages::INGREDIENTS_REQUIRED.to_owned()]
        );

        let errors = field_errors(RecipeWriteBody {
            ingredients: Some(vec![line(1, 2), line(1, 5)]),
            ..body()
        });
        assert_eq!(
            errors["ingredients"],
            vec![error_messages::DUPLICATE_INGREDIENT.to_owned()]
        );

        assert!(field_errors(RecipeWriteBody {
            ingredients: Some(vec![line(1, 0)]),
            ..body()
        })
        .contains_key("ingredients"));

        assert!(field_errors(RecipeWriteBody {
            ingredients: None,
            ..body()
        })
        .contains_key("ingredients"));
    }

    #[test]
    fn test_duplicate_tags_and_cooking_time() {
        let errors = field_errors(RecipeWriteBody {
            tags: Some(vec![3, 3]),
            cooking_time: Some(0),
            ..body()
        });
        assert!(errors.contains_key("tags"));
        assert!(errors.contains_key("cooking_time"));
    }

    #[test]
    fn test_update_keeps_absent_fields_unset() {
        let (patch, image) = RecipeWriteBody {
            tags: Some(vec![2, 3]),
            ..RecipeWriteBody::default()
        }
        .validate_update()
        .unwrap();
        assert_eq!(patch.tags, Some(vec![2, 3]));
        assert!(patch.ingredients.is_none());
        assert!(patch.name.is_none());
        assert!(image.is_none());

        assert!(RecipeWriteBody {
            ingredients: Some(Vec::new()),
            ..RecipeWriteBody::default()
        }
        .validate_update()
        .is_err());
    }
}
