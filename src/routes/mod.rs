// ABOUTME: Route module organization for the Foodgram HTTP API
// ABOUTME: Assembles per-resource routers, media serving and the shared middleware stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! Route module for Foodgram
//!
//! Each resource has an explicit route table with thin handlers: resolve the
//! identity, apply the access policy, validate through `serializers`, then
//! call the database or a service.

/// Token login and the credential service
pub mod auth;
/// Extractor rejection and path id helpers
pub mod extract;
/// Health check
pub mod health;
/// Ingredient reads and search
pub mod ingredients;
/// Recipes, favourites, cart and shopping list
pub mod recipes;
/// Tag reads and admin writes
pub mod tags;
/// Accounts and subscriptions
pub mod users;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::Uri, Router};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;

use crate::constants::{endpoints, limits};
use crate::errors::AppError;
use crate::middleware::{setup_cors, trace_layer};
use crate::resources::ServerResources;

pub use auth::{AuthRoutes, AuthService};
pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use recipes::RecipeRoutes;
pub use tags::TagRoutes;
pub use users::UserRoutes;

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let media = ServeDir::new(resources.media.root());
    let cors = setup_cors(&resources.config);

    Router::new()
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(UserRoutes::routes(Arc::clone(&resources)))
        .merge(TagRoutes::routes(Arc::clone(&resources)))
        .merge(IngredientRoutes::routes(Arc::clone(&resources)))
        .merge(RecipeRoutes::routes(Arc::clone(&resources)))
        .merge(HealthRoutes::routes(resources))
        .nest_service(endpoints::MEDIA, media)
        .fallback(handle_not_found)
        .layer(DefaultBodyLimit::max(limits::MAX_REQUEST_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(trace_layer())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors),
        )
}

async fn handle_not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Endpoint {}", uri.path()))
}
