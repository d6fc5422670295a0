// ABOUTME: User endpoints: registration, profiles, current user and password change
// ABOUTME: Also hosts subscription listing and the subscribe/unsubscribe toggle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! User routes
//!
//! Registration and profile reads are public. `me`, `set_password` and
//! everything subscription related need an authenticated identity.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::{Query, QueryRejection};
use serde::Deserialize;
use tracing::info;

use super::auth::AuthService;
use super::extract::{json_body, parse_id, query_params};
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::User;
use crate::pagination::{Page, PageParams};
use crate::resources::ServerResources;
use crate::serializers::{
    users::parse_recipes_limit, RecipeSummaryResponse, RegisterBody, SetPasswordBody,
    SubscriptionResponse, UserCreatedResponse, UserPatchBody, UserResponse,
};

const USER: &str = "User";

/// Query for paginated user listings
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
    /// Recipes shown per subscribed author
    pub recipes_limit: Option<String>,
}

/// User routes implementation
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users/",
                get(Self::handle_list).post(Self::handle_register),
            )
            .route("/api/users/me/", get(Self::handle_me).patch(Self::handle_update_me))
            .route("/api/users/set_password/", post(Self::handle_set_password))
            .route(
                "/api/users/subscriptions/",
                get(Self::handle_subscriptions),
            )
            .route("/api/users/:id/", get(Self::handle_get))
            .route(
                "/api/users/:id/subscribe/",
                post(Self::handle_subscribe).delete(Self::handle_unsubscribe),
            )
            .with_state(resources)
    }

    /// Attach author recipes and counts to each followed account
    async fn subscription_responses(
        resources: &ServerResources,
        authors: Vec<User>,
        recipes_limit: Option<i64>,
    ) -> AppResult<Vec<SubscriptionResponse>> {
        let ids: Vec<i64> = authors.iter().map(|u| u.id).collect();
        let mut summaries = resources
            .database
            .recipe_summaries_for_authors(&ids, recipes_limit)
            .await?;
        let counts = resources.database.recipe_counts_for_authors(&ids).await?;

        Ok(authors
            .into_iter()
            .map(|author| {
                let recipes = summaries
                    .remove(&author.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|summary| RecipeSummaryResponse::new(summary, &resources.media))
                    .collect();
                SubscriptionResponse {
                    recipes_count: counts.get(&author.id).copied().unwrap_or(0),
                    user: UserResponse::new(author, true),
                    recipes,
                }
            })
            .collect())
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Handle GET /api/users/ - Paginated user list
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
        query: Result<Query<UserListQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_optional(&headers).await?;
        let query = query_params(query)?;
        let params = PageParams::from_raw(
            query.page.as_deref(),
            query.limit.as_deref(),
            &resources.config.pagination,
        )?;

        let (users, count) = resources
            .database
            .list_users(params.limit(), params.offset())
            .await?;

        let followed = match &auth {
            Some(auth) => {
                let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
                resources
                    .database
                    .subscribed_among(auth.user_id, &ids)
                    .await?
            }
            None => Default::default(),
        };

        let page = Page::new(users, count, params, &uri)?.map(|user| {
            let is_subscribed = followed.contains(&user.id);
            UserResponse::new(user, is_subscribed)
        });
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle POST /api/users/ - Register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<RegisterBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let registration = json_body(payload)?.validate()?;
        let user = AuthService::new(&resources).register(registration).await?;
        Ok((StatusCode::CREATED, Json(UserCreatedResponse::from(user))).into_response())
    }

    /// Handle GET /api/users/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_optional(&headers).await?;
        let user_id = parse_id(&id, USER)?;
        let user = resources.database.get_user_required(user_id).await?;

        let is_subscribed = match &auth {
            Some(auth) => resources.database.is_subscribed(auth.user_id, user.id).await?,
            None => false,
        };
        Ok((StatusCode::OK, Json(UserResponse::new(user, is_subscribed))).into_response())
    }

    /// Handle GET /api/users/me/
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_request(&headers).await?;
        let user = resources.database.get_user_required(auth.user_id).await?;
        Ok((StatusCode::OK, Json(UserResponse::new(user, false))).into_response())
    }

    /// Handle PATCH /api/users/me/ - Partial profile update
    async fn handle_update_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<UserPatchBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_request(&headers).await?;
        let update = json_body(payload)?.validate()?;
        let user = resources.database.update_user(auth.user_id, &update).await?;
        info!(user_id = user.id, "Profile updated");
        Ok((StatusCode::OK, Json(UserResponse::new(user, false))).into_response())
    }

    /// Handle POST /api/users/set_password/
    async fn handle_set_password(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<SetPasswordBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_request(&headers).await?;
        let (new_password, current_password) = json_body(payload)?.validate()?;
        AuthService::new(&resources)
            .set_password(auth.user_id, new_password, current_password)
            .await?;
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Handle GET /api/users/subscriptions/ - Followed authors with their recipes
    async fn handle_subscriptions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
        query: Result<Query<UserListQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_request(&headers).await?;
        let query = query_params(query)?;
        let recipes_limit = parse_recipes_limit(query.recipes_limit.as_deref())?;
        let params = PageParams::from_raw(
            query.page.as_deref(),
            query.limit.as_deref(),
            &resources.config.pagination,
        )?;

        let (authors, count) = resources
            .database
            .list_subscriptions(auth.user_id, params.limit(), params.offset())
            .await?;
        let results = Self::subscription_responses(&resources, authors, recipes_limit).await?;

        let page = Page::new(results, count, params, &uri)?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle POST /api/users/:id/subscribe/
    async fn handle_subscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        query: Result<Query<UserListQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_request(&headers).await?;
        let author_id = parse_id(&id, USER)?;
        let recipes_limit = parse_recipes_limit(query_params(query)?.recipes_limit.as_deref())?;
        let author = resources.database.get_user_required(author_id).await?;

        resources.database.subscribe(auth.user_id, author.id).await?;
        info!(user_id = auth.user_id, author_id, "Subscribed");

        let response = Self::subscription_responses(&resources, vec![author], recipes_limit)
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("Subscription response was not built"))?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle DELETE /api/users/:id/subscribe/
    async fn handle_unsubscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_request(&headers).await?;
        let author_id = parse_id(&id, USER)?;
        resources.database.get_user_required(author_id).await?;

        if !resources
            .database
            .unsubscribe(auth.user_id, author_id)
            .await?
        {
            return Err(AppError::new(
                ErrorCode::ResourceNotFound,
                error_messages::NOT_SUBSCRIBED,
            ));
        }
        info!(user_id = auth.user_id, author_id, "Unsubscribed");
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}
