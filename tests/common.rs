// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Builds an in-memory app with temp media storage plus user, token and seed helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `foodgram`
//!
//! Every test gets its own in-memory database and media directory so tests
//! can run in parallel without sharing state.

use std::sync::{Arc, Once};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use foodgram::{
    auth::hash_password,
    config::ServerConfig,
    database::Database,
    models::{Ingredient, NewIngredient, NewTag, NewUser, Tag, User},
    permissions::UserRole,
    resources::ServerResources,
    routes::build_router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

static INIT_LOGGER: Once = Once::new();

/// Password given to every user created through `create_user`
pub const TEST_PASSWORD: &str = "s3cret-pass";

/// Lowest cost bcrypt accepts; keeps hashing fast in tests
const TEST_BCRYPT_COST: u32 = 4;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// A fully wired application backed by an in-memory database
pub struct TestApp {
    pub resources: Arc<ServerResources>,
    pub media_dir: TempDir,
}

impl TestApp {
    /// Fresh router over the shared resources
    pub fn router(&self) -> Router {
        build_router(self.resources.clone())
    }

    pub fn db(&self) -> &Database {
        &self.resources.database
    }

    /// Insert a regular user directly
    pub async fn create_user(&self, username: &str) -> User {
        self.create_user_with_role(username, UserRole::User).await
    }

    /// Insert a user with the given role directly
    pub async fn create_user_with_role(&self, username: &str, role: UserRole) -> User {
        let password_hash = hash_password(TEST_PASSWORD.to_owned(), TEST_BCRYPT_COST)
            .await
            .expect("hash password");
        self.db()
            .create_user(&NewUser {
                username: username.to_owned(),
                email: format!("{username}@example.com"),
                first_name: "Test".to_owned(),
                last_name: username.to_owned(),
                password_hash,
                role,
            })
            .await
            .expect("create user")
    }

    /// Signed token for a user
    pub fn token(&self, user: &User) -> String {
        self.resources
            .auth_manager
            .generate_token(user)
            .expect("generate token")
    }

    /// Insert a tag directly
    pub async fn create_tag(&self, name: &str, slug: &str) -> Tag {
        self.db()
            .create_tag(&NewTag {
                name: name.to_owned(),
                color: "#E26C2D".to_owned(),
                slug: slug.to_owned(),
            })
            .await
            .expect("create tag")
    }

    /// Insert an ingredient directly
    pub async fn create_ingredient(&self, name: &str, unit: &str) -> Ingredient {
        self.db()
            .create_ingredient(&NewIngredient {
                name: name.to_owned(),
                measurement_unit: unit.to_owned(),
            })
            .await
            .expect("create ingredient")
    }

    /// Create a recipe over HTTP as `token`'s owner and return its JSON
    pub async fn create_recipe(
        &self,
        token: &str,
        name: &str,
        tags: &[i64],
        ingredients: &[(i64, i64)],
    ) -> Value {
        let ingredients: Vec<Value> = ingredients
            .iter()
            .map(|(id, amount)| json!({"id": id, "amount": amount}))
            .collect();
        let body = json!({
            "name": name,
            "text": format!("How to cook {name}"),
            "cooking_time": 15,
            "tags": tags,
            "ingredients": ingredients,
        });
        let request = Request::post("/api/recipes/")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request");

        let response = self.router().oneshot(request).await.expect("send request");
        assert_eq!(response.status(), StatusCode::CREATED, "recipe creation failed");
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("recipe json")
    }
}

/// Build an application with fast hashing and a private media directory
pub async fn create_test_app() -> TestApp {
    init_test_logging();
    let media_dir = TempDir::new().expect("create media dir");

    let mut config = ServerConfig::default();
    config.auth.bcrypt_cost = TEST_BCRYPT_COST;
    config.media.root = media_dir.path().to_path_buf();

    let database = Database::connect(&config.database)
        .await
        .expect("connect in-memory database");

    TestApp {
        resources: Arc::new(ServerResources::new(database, config)),
        media_dir,
    }
}

/// One-pixel transparent PNG as a data URI
pub const TINY_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
