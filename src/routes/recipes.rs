// ABOUTME: Recipe endpoints: list, detail, create, update, delete and membership toggles
// ABOUTME: Also serves the plain-text shopping list aggregated from the user's cart
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! Recipe routes
//!
//! Reads are public. Writes follow `AuthorOrStaffOrReadOnly`; favourites, the
//! cart and the shopping list require an authenticated identity.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::{Query, QueryRejection};
use tracing::info;

use super::extract::{json_body, parse_id, query_params};
use crate::constants::shopping_list;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::filters::{RecipeFilter, RecipeListQuery};
use crate::middleware::AuthResult;
use crate::models::{MembershipKind, RecipeSummary};
use crate::pagination::{Page, PageParams};
use crate::permissions::AccessPolicy;
use crate::resources::ServerResources;
use crate::serializers::{RecipeResponse, RecipeSummaryResponse, RecipeWriteBody};
use crate::services::{self, shopping_list::render_shopping_list};

const RECIPE: &str = "Recipe";
const POLICY: AccessPolicy = AccessPolicy::AuthorOrStaffOrReadOnly;

/// Recipe routes implementation
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes/",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/recipes/download_shopping_cart/",
                get(Self::handle_download_shopping_cart),
            )
            .route(
                "/api/recipes/:id/",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/recipes/:id/favorite/",
                post(Self::handle_favorite_add).delete(Self::handle_favorite_remove),
            )
            .route(
                "/api/recipes/:id/shopping_cart/",
                post(Self::handle_cart_add).delete(Self::handle_cart_remove),
            )
            .with_state(resources)
    }

    async fn identity(
        headers: &HeaderMap,
        resources: &ServerResources,
    ) -> AppResult<Option<AuthResult>> {
        resources.auth_middleware.authenticate_optional(headers).await
    }

    async fn respond_with_recipe(
        resources: &ServerResources,
        recipe_id: i64,
        viewer: Option<i64>,
        status: StatusCode,
    ) -> Result<Response, AppError> {
        let detail = resources
            .database
            .get_recipe_detail(recipe_id, viewer)
            .await?
            .ok_or_else(|| AppError::not_found(RECIPE))?;
        let response = RecipeResponse::new(detail, &resources.media);
        Ok((status, Json(response)).into_response())
    }

    // ========================================================================
    // Recipes
    // ========================================================================

    /// Handle GET /api/recipes/ - Filtered, paginated list
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
        query: Result<Query<RecipeListQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let auth = Self::identity(&headers, &resources).await?;
        let query = query_params(query)?;
        let filter = RecipeFilter::from_query(&query)?;
        let params = PageParams::from_raw(
            query.page.as_deref(),
            query.limit.as_deref(),
            &resources.config.pagination,
        )?;

        let viewer = auth.as_ref().map(|a| a.user_id);
        let (recipes, count) = resources
            .database
            .list_recipes(&filter, viewer, params.limit(), params.offset())
            .await?;

        let page = Page::new(recipes, count, params, &uri)?
            .map(|detail| RecipeResponse::new(detail, &resources.media));
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle POST /api/recipes/ - Create a recipe authored by the caller
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<RecipeWriteBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = Self::identity(&headers, &resources).await?;
        POLICY.check_request(&Method::POST, auth.as_ref())?;
        let auth = auth.ok_or_else(AppError::auth_required)?;

        let (draft, image) = json_body(payload)?.validate_create()?;
        let recipe_id = services::recipes::create_recipe(
            &resources.database,
            &resources.media,
            auth.user_id,
            draft,
            image,
        )
        .await?;

        Self::respond_with_recipe(&resources, recipe_id, Some(auth.user_id), StatusCode::CREATED)
            .await
    }

    /// Handle GET /api/recipes/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let recipe_id = parse_id(&id, RECIPE)?;
        let auth = Self::identity(&headers, &resources).await?;
        Self::respond_with_recipe(
            &resources,
            recipe_id,
            auth.map(|a| a.user_id),
            StatusCode::OK,
        )
        .await
    }

    /// Handle PATCH /api/recipes/:id/ - Partial update by the author or staff
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        payload: Result<Json<RecipeWriteBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = Self::identity(&headers, &resources).await?;
        POLICY.check_request(&Method::PATCH, auth.as_ref())?;
        let recipe_id = parse_id(&id, RECIPE)?;

        let recipe = resources.database.get_recipe_required(recipe_id).await?;
        POLICY.check_object(&Method::PATCH, auth.as_ref(), recipe.author_id)?;

        let (patch, image) = json_body(payload)?.validate_update()?;
        services::recipes::update_recipe(
            &resources.database,
            &resources.media,
            recipe_id,
            patch,
            image,
        )
        .await?;

        Self::respond_with_recipe(
            &resources,
            recipe_id,
            auth.map(|a| a.user_id),
            StatusCode::OK,
        )
        .await
    }

    /// Handle DELETE /api/recipes/:id/
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = Self::identity(&headers, &resources).await?;
        POLICY.check_request(&Method::DELETE, auth.as_ref())?;
        let recipe_id = parse_id(&id, RECIPE)?;

        let recipe = resources.database.get_recipe_required(recipe_id).await?;
        POLICY.check_object(&Method::DELETE, auth.as_ref(), recipe.author_id)?;

        if !services::recipes::delete_recipe(&resources.database, &resources.media, recipe_id)
            .await?
        {
            return Err(AppError::not_found(RECIPE));
        }
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    // ========================================================================
    // Favourites and shopping cart
    // ========================================================================

    async fn add_membership(
        resources: &ServerResources,
        headers: &HeaderMap,
        id: &str,
        kind: MembershipKind,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_request(headers).await?;
        let recipe_id = parse_id(id, RECIPE)?;
        let recipe = resources.database.get_recipe_required(recipe_id).await?;

        resources
            .database
            .add_membership(kind, auth.user_id, recipe_id)
            .await?;
        info!(user_id = auth.user_id, recipe_id, %kind, "Recipe added");

        let response = RecipeSummaryResponse::new(RecipeSummary::from(&recipe), &resources.media);
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    async fn remove_membership(
        resources: &ServerResources,
        headers: &HeaderMap,
        id: &str,
        kind: MembershipKind,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_request(headers).await?;
        let recipe_id = parse_id(id, RECIPE)?;
        resources.database.get_recipe_required(recipe_id).await?;

        if !resources
            .database
            .remove_membership(kind, auth.user_id, recipe_id)
            .await?
        {
            return Err(AppError::new(
                ErrorCode::ResourceNotFound,
                kind.absent_message(),
            ));
        }
        info!(user_id = auth.user_id, recipe_id, %kind, "Recipe removed");
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    /// Handle POST /api/recipes/:id/favorite/
    async fn handle_favorite_add(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::add_membership(&resources, &headers, &id, MembershipKind::Favourite).await
    }

    /// Handle DELETE /api/recipes/:id/favorite/
    async fn handle_favorite_remove(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::remove_membership(&resources, &headers, &id, MembershipKind::Favourite).await
    }

    /// Handle POST /api/recipes/:id/shopping_cart/
    async fn handle_cart_add(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::add_membership(&resources, &headers, &id, MembershipKind::ShoppingCart).await
    }

    /// Handle DELETE /api/recipes/:id/shopping_cart/
    async fn handle_cart_remove(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::remove_membership(&resources, &headers, &id, MembershipKind::ShoppingCart).await
    }

    /// Handle GET /api/recipes/download_shopping_cart/ - Plain-text attachment
    async fn handle_download_shopping_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources
            .auth_middleware
            .authenticate_request(&headers)
            .await?;

        let items = resources.database.shopping_list(auth.user_id).await?;
        info!(user_id = auth.user_id, lines = items.len(), "Shopping list rendered");

        let disposition = format!("attachment; filename=\"{}\"", shopping_list::FILENAME);
        Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, shopping_list::CONTENT_TYPE.to_owned()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            render_shopping_list(&items),
        )
            .into_response())
    }
}
