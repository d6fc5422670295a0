// ABOUTME: HTTP tests for recipe CRUD, filtering and pagination
// ABOUTME: Covers author/staff permissions, tag replacement, images and cascade deletes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use common::{create_test_app, TINY_PNG};
use foodgram::models::MembershipKind;
use foodgram::permissions::UserRole;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

fn tag_slugs(recipe: &Value) -> Vec<String> {
    recipe["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["slug"].as_str().unwrap().to_owned())
        .collect()
}

#[tokio::test]
async fn test_create_recipe_returns_full_representation() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let token = app.token(&author);
    let breakfast = app.create_tag("Breakfast", "breakfast").await;
    let eggs = app.create_ingredient("eggs", "pcs").await;
    let salt = app.create_ingredient("salt", "g").await;

    let response = AxumTestRequest::post("/api/recipes/")
        .bearer(&token)
        .json(&json!({
            "name": "Omelette",
            "text": "Whisk and fry.",
            "cooking_time": 10,
            "tags": [breakfast.id],
            "ingredients": [{"id": eggs.id, "amount": 3}, {"id": salt.id, "amount": 2}],
            "image": TINY_PNG,
        }))
        .send(app.router())
        .await;

    assert_eq!(response.status(), 201);
    let recipe: Value = response.json();
    assert_eq!(recipe["name"], "Omelette");
    assert_eq!(recipe["cooking_time"], 10);
    assert_eq!(recipe["author"]["username"], "chef");
    assert_eq!(recipe["author"]["is_subscribed"], false);
    assert_eq!(recipe["is_favorited"], false);
    assert_eq!(recipe["is_in_shopping_cart"], false);
    assert_eq!(tag_slugs(&recipe), vec!["breakfast"]);

    let lines = recipe["ingredients"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["name"], "eggs");
    assert_eq!(lines[0]["measurement_unit"], "pcs");
    assert_eq!(lines[0]["amount"], 3);

    let image = recipe["image"].as_str().unwrap();
    assert!(image.starts_with("/media/recipes/"));
    let stored = app
        .media_dir
        .path()
        .join(image.trim_start_matches("/media/"));
    assert!(stored.exists());
}

#[tokio::test]
async fn test_create_recipe_requires_authentication() {
    let app = create_test_app().await;
    let salt = app.create_ingredient("salt", "g").await;

    let response = AxumTestRequest::post("/api/recipes/")
        .json(&json!({
            "name": "Soup",
            "text": "Boil.",
            "cooking_time": 30,
            "ingredients": [{"id": salt.id, "amount": 1}],
        }))
        .send(app.router())
        .await;

    assert_eq!(response.status(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "AUTH_REQUIRED");
}

#[tokio::test]
async fn test_create_recipe_validation_errors() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let token = app.token(&author);
    let salt = app.create_ingredient("salt", "g").await;

    let response = AxumTestRequest::post("/api/recipes/")
        .bearer(&token)
        .json(&json!({
            "name": "Soup",
            "text": "Boil.",
            "cooking_time": 0,
            "ingredients": [{"id": salt.id, "amount": 1}, {"id": salt.id, "amount": 2}],
        }))
        .send(app.router())
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert!(body["error"]["details"]["cooking_time"].is_array());
    assert!(body["error"]["details"]["ingredients"].is_array());

    let empty = AxumTestRequest::post("/api/recipes/")
        .bearer(&token)
        .json(&json!({
            "name": "Air",
            "text": "Nothing.",
            "cooking_time": 1,
            "ingredients": [],
        }))
        .send(app.router())
        .await;
    assert_eq!(empty.status(), 400);
}

#[tokio::test]
async fn test_create_recipe_with_unknown_references() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let token = app.token(&author);
    let salt = app.create_ingredient("salt", "g").await;

    let response = AxumTestRequest::post("/api/recipes/")
        .bearer(&token)
        .json(&json!({
            "name": "Mystery",
            "text": "Unknown.",
            "cooking_time": 5,
            "tags": [999],
            "ingredients": [{"id": salt.id, "amount": 1}, {"id": 12345, "amount": 1}],
        }))
        .send(app.router())
        .await;

    assert_eq!(response.status(), 400);
    let (recipes, count) = app
        .db()
        .list_recipes(&Default::default(), None, 10, 0)
        .await
        .unwrap();
    assert!(recipes.is_empty());
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_get_recipe_and_missing_ids() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let token = app.token(&author);
    let salt = app.create_ingredient("salt", "g").await;
    let created = app.create_recipe(&token, "Soup", &[], &[(salt.id, 5)]).await;
    let id = created["id"].as_i64().unwrap();

    let response = AxumTestRequest::get(&format!("/api/recipes/{id}/"))
        .send(app.router())
        .await;
    assert_eq!(response.status(), 200);
    let recipe: Value = response.json();
    assert_eq!(recipe["name"], "Soup");

    for path in ["/api/recipes/9999/", "/api/recipes/abc/", "/api/recipes/0/"] {
        let response = AxumTestRequest::get(path).send(app.router()).await;
        assert_eq!(response.status(), 404, "{path}");
    }
}

#[tokio::test]
async fn test_patch_replaces_tags_and_keeps_other_fields() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let token = app.token(&author);
    let a = app.create_tag("Alpha", "a").await;
    let b = app.create_tag("Beta", "b").await;
    let c = app.create_tag("Gamma", "c").await;
    let salt = app.create_ingredient("salt", "g").await;

    let created = app
        .create_recipe(&token, "Soup", &[a.id, b.id], &[(salt.id, 5)])
        .await;
    let id = created["id"].as_i64().unwrap();

    let response = AxumTestRequest::patch(&format!("/api/recipes/{id}/"))
        .bearer(&token)
        .json(&json!({"tags": [b.id, c.id]}))
        .send(app.router())
        .await;

    assert_eq!(response.status(), 200);
    let recipe: Value = response.json();
    assert_eq!(tag_slugs(&recipe), vec!["b", "c"]);
    assert_eq!(recipe["name"], "Soup");
    assert_eq!(recipe["ingredients"][0]["amount"], 5);
}

#[tokio::test]
async fn test_patch_replaces_ingredients_and_image() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let token = app.token(&author);
    let salt = app.create_ingredient("salt", "g").await;
    let sugar = app.create_ingredient("sugar", "g").await;
    let created = app.create_recipe(&token, "Soup", &[], &[(salt.id, 5)]).await;
    let id = created["id"].as_i64().unwrap();

    let first = AxumTestRequest::patch(&format!("/api/recipes/{id}/"))
        .bearer(&token)
        .json(&json!({"image": TINY_PNG}))
        .send(app.router())
        .await;
    assert_eq!(first.status(), 200);
    let first: Value = first.json();
    let old_image = first["image"].as_str().unwrap().to_owned();

    let second = AxumTestRequest::patch(&format!("/api/recipes/{id}/"))
        .bearer(&token)
        .json(&json!({
            "image": TINY_PNG,
            "ingredients": [{"id": sugar.id, "amount": 7}],
            "cooking_time": 45,
        }))
        .send(app.router())
        .await;
    assert_eq!(second.status(), 200);
    let second: Value = second.json();

    let lines = second["ingredients"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["name"], "sugar");
    assert_eq!(lines[0]["amount"], 7);
    assert_eq!(second["cooking_time"], 45);

    let new_image = second["image"].as_str().unwrap();
    assert_ne!(new_image, old_image);
    let root = app.media_dir.path();
    assert!(!root.join(old_image.trim_start_matches("/media/")).exists());
    assert!(root.join(new_image.trim_start_matches("/media/")).exists());
}

#[tokio::test]
async fn test_only_author_or_staff_may_modify() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let stranger = app.create_user("stranger").await;
    let moderator = app
        .create_user_with_role("moderator", UserRole::Moderator)
        .await;
    let salt = app.create_ingredient("salt", "g").await;
    let created = app
        .create_recipe(&app.token(&author), "Soup", &[], &[(salt.id, 5)])
        .await;
    let path = format!("/api/recipes/{}/", created["id"]);

    let anonymous = AxumTestRequest::patch(&path)
        .json(&json!({"name": "Stolen"}))
        .send(app.router())
        .await;
    assert_eq!(anonymous.status(), 401);

    let forbidden = AxumTestRequest::patch(&path)
        .bearer(&app.token(&stranger))
        .json(&json!({"name": "Stolen"}))
        .send(app.router())
        .await;
    assert_eq!(forbidden.status(), 403);

    let forbidden_delete = AxumTestRequest::delete(&path)
        .bearer(&app.token(&stranger))
        .send(app.router())
        .await;
    assert_eq!(forbidden_delete.status(), 403);

    let staff = AxumTestRequest::patch(&path)
        .bearer(&app.token(&moderator))
        .json(&json!({"name": "Moderated soup"}))
        .send(app.router())
        .await;
    assert_eq!(staff.status(), 200);
    let recipe: Value = staff.json();
    assert_eq!(recipe["name"], "Moderated soup");
    assert_eq!(recipe["author"]["username"], "chef");
}

#[tokio::test]
async fn test_delete_cascades_to_memberships() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let fan = app.create_user("fan").await;
    let salt = app.create_ingredient("salt", "g").await;
    let token = app.token(&author);
    let created = app.create_recipe(&token, "Soup", &[], &[(salt.id, 5)]).await;
    let id = created["id"].as_i64().unwrap();

    let fan_token = app.token(&fan);
    for suffix in ["favorite", "shopping_cart"] {
        let response = AxumTestRequest::post(&format!("/api/recipes/{id}/{suffix}/"))
            .bearer(&fan_token)
            .send(app.router())
            .await;
        assert_eq!(response.status(), 201);
    }

    let response = AxumTestRequest::delete(&format!("/api/recipes/{id}/"))
        .bearer(&token)
        .send(app.router())
        .await;
    assert_eq!(response.status(), 204);

    assert!(app.db().get_recipe(id).await.unwrap().is_none());
    for kind in [MembershipKind::Favourite, MembershipKind::ShoppingCart] {
        let left: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE recipe_id = $1",
            kind.table()
        ))
        .bind(id)
        .fetch_one(app.db().pool())
        .await
        .unwrap();
        assert_eq!(left, 0, "{kind}");
    }
    assert!(app.db().shopping_list(fan.id).await.unwrap().is_empty());

    let again = AxumTestRequest::get(&format!("/api/recipes/{id}/"))
        .send(app.router())
        .await;
    assert_eq!(again.status(), 404);
}

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let app = create_test_app().await;
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let lunch = app.create_tag("Lunch", "lunch").await;
    let dinner = app.create_tag("Dinner", "dinner").await;
    let salt = app.create_ingredient("salt", "g").await;

    let alice_token = app.token(&alice);
    let bob_token = app.token(&bob);
    let first = app
        .create_recipe(&alice_token, "First", &[lunch.id], &[(salt.id, 1)])
        .await;
    app.create_recipe(&alice_token, "Second", &[dinner.id], &[(salt.id, 1)])
        .await;
    app.create_recipe(&bob_token, "Third", &[lunch.id, dinner.id], &[(salt.id, 1)])
        .await;

    let all: Value = AxumTestRequest::get("/api/recipes/")
        .send(app.router())
        .await
        .json();
    assert_eq!(all["count"], 3);
    assert_eq!(all["results"][0]["name"], "Third");

    let by_author: Value = AxumTestRequest::get(&format!("/api/recipes/?author={}", alice.id))
        .send(app.router())
        .await
        .json();
    assert_eq!(by_author["count"], 2);

    let lunch_only: Value = AxumTestRequest::get("/api/recipes/?tags=lunch")
        .send(app.router())
        .await
        .json();
    assert_eq!(lunch_only["count"], 2);

    let any_tag: Value = AxumTestRequest::get("/api/recipes/?tags=lunch&tags=dinner")
        .send(app.router())
        .await
        .json();
    assert_eq!(any_tag["count"], 3);

    let page: Value = AxumTestRequest::get("/api/recipes/?limit=2")
        .send(app.router())
        .await
        .json();
    assert_eq!(page["results"].as_array().unwrap().len(), 2);
    assert!(page["next"].as_str().unwrap().contains("page=2"));
    assert!(page["previous"].is_null());

    let second: Value = AxumTestRequest::get("/api/recipes/?limit=2&page=2")
        .send(app.router())
        .await
        .json();
    assert_eq!(second["results"].as_array().unwrap().len(), 1);
    assert_eq!(second["results"][0]["id"], first["id"]);
    assert!(second["next"].is_null());

    let past_end = AxumTestRequest::get("/api/recipes/?limit=2&page=5")
        .send(app.router())
        .await;
    assert_eq!(past_end.status(), 404);
}

#[tokio::test]
async fn test_membership_filters_follow_viewer() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let fan = app.create_user("fan").await;
    let salt = app.create_ingredient("salt", "g").await;
    let token = app.token(&author);
    let liked = app.create_recipe(&token, "Liked", &[], &[(salt.id, 1)]).await;
    app.create_recipe(&token, "Ignored", &[], &[(salt.id, 1)]).await;

    let fan_token = app.token(&fan);
    AxumTestRequest::post(&format!("/api/recipes/{}/favorite/", liked["id"]))
        .bearer(&fan_token)
        .send(app.router())
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let favourites: Value = AxumTestRequest::get("/api/recipes/?is_favorited=1")
        .bearer(&fan_token)
        .send(app.router())
        .await
        .json();
    assert_eq!(favourites["count"], 1);
    assert_eq!(favourites["results"][0]["name"], "Liked");
    assert_eq!(favourites["results"][0]["is_favorited"], true);

    let anonymous: Value = AxumTestRequest::get("/api/recipes/?is_favorited=1")
        .send(app.router())
        .await
        .json();
    assert_eq!(anonymous["count"], 0);

    let cart: Value = AxumTestRequest::get("/api/recipes/?is_in_shopping_cart=true")
        .bearer(&fan_token)
        .send(app.router())
        .await
        .json();
    assert_eq!(cart["count"], 0);

    let bad_flag = AxumTestRequest::get("/api/recipes/?is_favorited=maybe")
        .bearer(&fan_token)
        .send(app.router())
        .await;
    assert_eq!(bad_flag.status(), 400);
}
