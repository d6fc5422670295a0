// ABOUTME: Recipe write orchestration across the database and media storage
// ABOUTME: Stores images before the transaction and cleans up files the write leaves orphaned
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use tracing::info;

use crate::database::Database;
use crate::errors::AppResult;
use crate::media::MediaStorage;
use crate::models::{RecipeDraft, RecipePatch};

/// Store the image (if any) and create the recipe
///
/// The new file is removed again when the database write fails.
///
/// # Errors
///
/// Returns image validation errors, storage errors, or any error from
/// [`Database::create_recipe`]
pub async fn create_recipe(
    database: &Database,
    media: &MediaStorage,
    author_id: i64,
    mut draft: RecipeDraft,
    image_data: Option<String>,
) -> AppResult<i64> {
    if let Some(data) = image_data {
        draft.image = Some(media.save_recipe_image(&data).await?);
    }

    match database.create_recipe(author_id, &draft).await {
        Ok(recipe_id) => {
            info!(recipe_id, author_id, "Recipe created");
            Ok(recipe_id)
        }
        Err(e) => {
            if let Some(path) = &draft.image {
                media.remove(path).await;
            }
            Err(e)
        }
    }
}

/// Store a replacement image (if any) and apply the patch
///
/// On success the previous image is removed; on failure the new one is.
///
/// # Errors
///
/// Returns not-found for an unknown recipe, image validation or storage
/// errors, or any error from [`Database::update_recipe`]
pub async fn update_recipe(
    database: &Database,
    media: &MediaStorage,
    recipe_id: i64,
    mut patch: RecipePatch,
    image_data: Option<String>,
) -> AppResult<()> {
    if let Some(data) = image_data {
        patch.image = Some(media.save_recipe_image(&data).await?);
    }

    let replaced = match database.update_recipe(recipe_id, &patch).await {
        Ok(replaced) => replaced,
        Err(e) => {
            if let Some(path) = &patch.image {
                media.remove(path).await;
            }
            return Err(e);
        }
    };

    if let Some(old) = &replaced {
        media.remove(old).await;
    }
    info!(recipe_id, "Recipe updated");
    Ok(())
}

/// Delete the recipe, then its image file
///
/// Returns `false` when no such recipe exists.
///
/// # Errors
///
/// Returns a database error if the delete fails
pub async fn delete_recipe(
    database: &Database,
    media: &MediaStorage,
    recipe_id: i64,
) -> AppResult<bool> {
    let Some(recipe) = database.get_recipe(recipe_id).await? else {
        return Ok(false);
    };
    if !database.delete_recipe(recipe_id).await? {
        return Ok(false);
    }
    if let Some(path) = &recipe.image {
        media.remove(path).await;
    }
    info!(recipe_id, "Recipe deleted");
    Ok(true)
}
