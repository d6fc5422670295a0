// ABOUTME: load-ingredients and load-tags commands for foodgram-cli
// ABOUTME: Reads JSON arrays and inserts rows, skipping ones that already exist
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::path::Path;

use anyhow::{Context, Result};
use foodgram::{
    constants::limits, database::Database, models::NewIngredient, serializers::TagWriteBody,
};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

async fn read_json<T: DeserializeOwned>(file: &Path) -> Result<Vec<T>> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", file.display()))
}

/// Load `[{"name": ..., "measurement_unit": ...}]`
pub async fn load_ingredients(database: &Database, file: &Path) -> Result<()> {
    let rows: Vec<NewIngredient> = read_json(file).await?;
    let total = rows.len();

    let valid: Vec<NewIngredient> = rows
        .into_iter()
        .map(|row| NewIngredient {
            name: row.name.trim().to_owned(),
            measurement_unit: row.measurement_unit.trim().to_owned(),
        })
        .filter(|row| {
            let ok = !row.name.is_empty()
                && !row.measurement_unit.is_empty()
                && row.name.chars().count() <= limits::MAX_LENGTH_NAME_INGREDIENT
                && row.measurement_unit.chars().count() <= limits::MAX_LENGTH_MEASUREMENT_UNIT;
            if !ok {
                warn!(name = %row.name, "Skipping invalid ingredient");
            }
            ok
        })
        .collect();

    let inserted = database.load_ingredients(&valid).await?;
    info!(inserted, total, "Ingredients loaded");
    println!("Loaded {inserted} of {total} ingredients from {}", file.display());
    Ok(())
}

/// Load `[{"name": ..., "color": ..., "slug": ...}]`
pub async fn load_tags(database: &Database, file: &Path) -> Result<()> {
    let rows: Vec<TagWriteBody> = read_json(file).await?;
    let total = rows.len();

    let mut valid = Vec::with_capacity(total);
    for (index, row) in rows.into_iter().enumerate() {
        match row.validate_create() {
            Ok(tag) => valid.push(tag),
            Err(e) => warn!(index, error = %e, "Skipping invalid tag"),
        }
    }

    let inserted = database.load_tags(&valid).await?;
    info!(inserted, total, "Tags loaded");
    println!("Loaded {inserted} of {total} tags from {}", file.display());
    Ok(())
}
