// ABOUTME: Health check route for service monitoring and load balancers
// ABOUTME: Reports service status and whether the database answers a trivial query
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::warn;

use crate::constants::{endpoints, service_names};
use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(endpoints::HEALTH_CHECK, get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET /health
    async fn handle_health(
        State(resources): State<Arc<ServerResources>>,
    ) -> (StatusCode, Json<Value>) {
        let database_ok = sqlx::query("SELECT 1")
            .execute(resources.database.pool())
            .await
            .map_err(|e| warn!(error = %e, "Health check database probe failed"))
            .is_ok();

        let status = if database_ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        (
            status,
            Json(json!({
                "status": if database_ok { "ok" } else { "degraded" },
                "service": service_names::FOODGRAM_SERVER,
                "version": env!("CARGO_PKG_VERSION"),
                "database": if database_ok { "ok" } else { "unavailable" },
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        )
    }
}
