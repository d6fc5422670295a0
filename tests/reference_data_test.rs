// ABOUTME: HTTP tests for tags, ingredients, the health probe and media serving
// ABOUTME: Checks admin-only tag writes and prefix-first ingredient search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use common::{create_test_app, TINY_PNG};
use foodgram::middleware::REQUEST_ID_HEADER;
use foodgram::permissions::UserRole;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

#[tokio::test]
async fn test_tag_reads_are_public() {
    let app = create_test_app().await;
    let lunch = app.create_tag("Lunch", "lunch").await;
    app.create_tag("Breakfast", "breakfast").await;

    let tags: Value = AxumTestRequest::get("/api/tags/")
        .send(app.router())
        .await
        .json();
    let slugs: Vec<&str> = tags
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["breakfast", "lunch"]);

    let one: Value = AxumTestRequest::get(&format!("/api/tags/{}/", lunch.id))
        .send(app.router())
        .await
        .json();
    assert_eq!(one["name"], "Lunch");
    assert_eq!(one["color"], "#E26C2D");

    let missing = AxumTestRequest::get("/api/tags/77/")
        .send(app.router())
        .await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_tag_writes_are_admin_only() {
    let app = create_test_app().await;
    let user = app.create_user("cook").await;
    let admin = app.create_user_with_role("root", UserRole::Admin).await;
    let body = json!({"name": "Dinner", "color": "#49B64E", "slug": "dinner"});

    let anonymous = AxumTestRequest::post("/api/tags/")
        .json(&body)
        .send(app.router())
        .await;
    assert_eq!(anonymous.status(), 401);

    let regular = AxumTestRequest::post("/api/tags/")
        .bearer(&app.token(&user))
        .json(&body)
        .send(app.router())
        .await;
    assert_eq!(regular.status(), 403);

    let admin_token = app.token(&admin);
    let created = AxumTestRequest::post("/api/tags/")
        .bearer(&admin_token)
        .json(&body)
        .send(app.router())
        .await;
    assert_eq!(created.status(), 201);
    let tag: Value = created.json();
    let path = format!("/api/tags/{}/", tag["id"]);

    let duplicate = AxumTestRequest::post("/api/tags/")
        .bearer(&admin_token)
        .json(&body)
        .send(app.router())
        .await;
    assert_eq!(duplicate.status(), 400);

    let renamed = AxumTestRequest::patch(&path)
        .bearer(&admin_token)
        .json(&json!({"name": "Supper"}))
        .send(app.router())
        .await;
    assert_eq!(renamed.status(), 200);
    let renamed: Value = renamed.json();
    assert_eq!(renamed["name"], "Supper");
    assert_eq!(renamed["slug"], "dinner");

    let deleted = AxumTestRequest::delete(&path)
        .bearer(&admin_token)
        .send(app.router())
        .await;
    assert_eq!(deleted.status(), 204);

    let gone = AxumTestRequest::delete(&path)
        .bearer(&admin_token)
        .send(app.router())
        .await;
    assert_eq!(gone.status(), 404);
}

#[tokio::test]
async fn test_tag_validation() {
    let app = create_test_app().await;
    let admin = app.create_user_with_role("root", UserRole::Admin).await;

    let response = AxumTestRequest::post("/api/tags/")
        .bearer(&app.token(&admin))
        .json(&json!({"name": "Bad", "color": "red", "slug": "not a slug"}))
        .send(app.router())
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert!(body["error"]["details"]["color"].is_array());
    assert!(body["error"]["details"]["slug"].is_array());
}

#[tokio::test]
async fn test_deleting_tag_detaches_it_from_recipes() {
    let app = create_test_app().await;
    let admin = app.create_user_with_role("root", UserRole::Admin).await;
    let soup = app.create_tag("Soup", "soup").await;
    let salt = app.create_ingredient("salt", "g").await;
    let token = app.token(&admin);
    let recipe = app
        .create_recipe(&token, "Broth", &[soup.id], &[(salt.id, 2)])
        .await;

    AxumTestRequest::delete(&format!("/api/tags/{}/", soup.id))
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    let detail: Value = AxumTestRequest::get(&format!("/api/recipes/{}/", recipe["id"]))
        .send(app.router())
        .await
        .json();
    assert!(detail["tags"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_ingredient_search_ranks_prefix_first() {
    let app = create_test_app().await;
    for (name, unit) in [
        ("black pepper", "g"),
        ("pepperoni", "g"),
        ("salt", "g"),
        ("Pepper", "pcs"),
    ] {
        app.create_ingredient(name, unit).await;
    }

    let all: Value = AxumTestRequest::get("/api/ingredients/")
        .send(app.router())
        .await
        .json();
    assert_eq!(all.as_array().unwrap().len(), 4);

    let found: Value = AxumTestRequest::get("/api/ingredients/?name=pep")
        .send(app.router())
        .await
        .json();
    let names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 3);
    assert_eq!(names.last(), Some(&"black pepper"));
    assert!(names[..2].contains(&"pepperoni"));
    assert!(names[..2].contains(&"Pepper"));

    let none: Value = AxumTestRequest::get("/api/ingredients/?name=zzz")
        .send(app.router())
        .await
        .json();
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_ingredient_search_wildcards_and_non_ascii_case() {
    let app = create_test_app().await;
    for (name, unit) in [("Соль", "г"), ("sugar_cane", "g"), ("SALT", "g")] {
        app.create_ingredient(name, unit).await;
    }

    let names = |body: Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|i| i["name"].as_str().unwrap().to_owned())
            .collect()
    };

    let percent: Value = AxumTestRequest::get("/api/ingredients/?name=%25")
        .send(app.router())
        .await
        .json();
    assert!(names(percent).is_empty());

    let underscore: Value = AxumTestRequest::get("/api/ingredients/?name=_")
        .send(app.router())
        .await
        .json();
    assert_eq!(names(underscore), vec!["sugar_cane"]);

    let cyrillic: Value = AxumTestRequest::get("/api/ingredients/?name=%D1%81%D0%BE%D0%BB")
        .send(app.router())
        .await
        .json();
    assert_eq!(names(cyrillic), vec!["Соль"]);

    let ascii: Value = AxumTestRequest::get("/api/ingredients/?name=sa")
        .send(app.router())
        .await
        .json();
    assert_eq!(names(ascii), vec!["SALT"]);
}

#[tokio::test]
async fn test_ingredient_detail_and_read_only() {
    let app = create_test_app().await;
    let admin = app.create_user_with_role("root", UserRole::Admin).await;
    let flour = app.create_ingredient("flour", "g").await;

    let detail: Value = AxumTestRequest::get(&format!("/api/ingredients/{}/", flour.id))
        .send(app.router())
        .await
        .json();
    assert_eq!(detail["name"], "flour");
    assert_eq!(detail["measurement_unit"], "g");

    let missing = AxumTestRequest::get("/api/ingredients/404/")
        .send(app.router())
        .await;
    assert_eq!(missing.status(), 404);

    let write = AxumTestRequest::post("/api/ingredients/")
        .bearer(&app.token(&admin))
        .json(&json!({"name": "milk", "measurement_unit": "ml"}))
        .send(app.router())
        .await;
    assert_eq!(write.status(), 405);
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;

    let response = AxumTestRequest::get("/health").send(app.router()).await;
    assert_eq!(response.status(), 200);
    assert!(response.header(REQUEST_ID_HEADER).is_some());
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_uploaded_image_is_served() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let salt = app.create_ingredient("salt", "g").await;

    let created: Value = AxumTestRequest::post("/api/recipes/")
        .bearer(&app.token(&author))
        .json(&json!({
            "name": "Picture",
            "text": "Pretty.",
            "cooking_time": 3,
            "ingredients": [{"id": salt.id, "amount": 1}],
            "image": TINY_PNG,
        }))
        .send(app.router())
        .await
        .json();

    let url = created["image"].as_str().unwrap();
    let response = AxumTestRequest::get(url).send(app.router()).await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.header("content-type").as_deref(), Some("image/png"));
}
