// ABOUTME: Tag endpoints: public listing and detail, admin-only writes
// ABOUTME: Tags are returned unpaginated and ordered by slug
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::info;

use super::extract::{json_body, parse_id};
use crate::errors::AppError;
use crate::permissions::AccessPolicy;
use crate::resources::ServerResources;
use crate::serializers::{TagResponse, TagWriteBody};

const TAG: &str = "Tag";
const POLICY: AccessPolicy = AccessPolicy::AdminOrReadOnly;

/// Tag routes implementation
pub struct TagRoutes;

impl TagRoutes {
    /// Create all tag routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/tags/", get(Self::handle_list).post(Self::handle_create))
            .route(
                "/api/tags/:id/",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Authenticate (when a header is present) and apply the admin policy
    async fn authorize(
        resources: &ServerResources,
        headers: &HeaderMap,
        method: &Method,
    ) -> Result<(), AppError> {
        let auth = resources.auth_middleware.authenticate_optional(headers).await?;
        POLICY.check_request(method, auth.as_ref())
    }

    /// Handle GET /api/tags/
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let tags: Vec<TagResponse> = resources
            .database
            .list_tags()
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok((StatusCode::OK, Json(tags)).into_response())
    }

    /// Handle GET /api/tags/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let tag_id = parse_id(&id, TAG)?;
        let tag = resources
            .database
            .get_tag(tag_id)
            .await?
            .ok_or_else(|| AppError::not_found(TAG))?;
        Ok((StatusCode::OK, Json(TagResponse::from(tag))).into_response())
    }

    /// Handle POST /api/tags/ - Admin only
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<TagWriteBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        Self::authorize(&resources, &headers, &Method::POST).await?;
        let new_tag = json_body(payload)?.validate_create()?;
        let tag = resources.database.create_tag(&new_tag).await?;
        info!(tag_id = tag.id, slug = %tag.slug, "Tag created");
        Ok((StatusCode::CREATED, Json(TagResponse::from(tag))).into_response())
    }

    /// Handle PATCH /api/tags/:id/ - Admin only
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        payload: Result<Json<TagWriteBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        Self::authorize(&resources, &headers, &Method::PATCH).await?;
        let tag_id = parse_id(&id, TAG)?;
        let update = json_body(payload)?.validate_update()?;
        let tag = resources.database.update_tag(tag_id, &update).await?;
        info!(tag_id, "Tag updated");
        Ok((StatusCode::OK, Json(TagResponse::from(tag))).into_response())
    }

    /// Handle DELETE /api/tags/:id/ - Admin only
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::authorize(&resources, &headers, &Method::DELETE).await?;
        let tag_id = parse_id(&id, TAG)?;
        if !resources.database.delete_tag(tag_id).await? {
            return Err(AppError::not_found(TAG));
        }
        info!(tag_id, "Tag deleted");
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}
