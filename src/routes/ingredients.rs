// ABOUTME: Read-only ingredient endpoints with case-insensitive name search
// ABOUTME: Prefix matches are listed before other substring matches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::{Query, QueryRejection};

use super::extract::{parse_id, query_params};
use crate::errors::AppError;
use crate::filters::IngredientQuery;
use crate::resources::ServerResources;
use crate::serializers::IngredientResponse;

const INGREDIENT: &str = "Ingredient";

/// Ingredient routes implementation
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ingredients/", get(Self::handle_list))
            .route("/api/ingredients/:id/", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle GET /api/ingredients/?name=
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        query: Result<Query<IngredientQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let query = query_params(query)?;
        let ingredients: Vec<IngredientResponse> = resources
            .database
            .search_ingredients(query.name.as_deref())
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok((StatusCode::OK, Json(ingredients)).into_response())
    }

    /// Handle GET /api/ingredients/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let ingredient_id = parse_id(&id, INGREDIENT)?;
        let ingredient = resources
            .database
            .get_ingredient(ingredient_id)
            .await?
            .ok_or_else(|| AppError::not_found(INGREDIENT))?;
        Ok((StatusCode::OK, Json(IngredientResponse::from(ingredient))).into_response())
    }
}
