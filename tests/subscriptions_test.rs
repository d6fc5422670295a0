// ABOUTME: HTTP tests for following authors and the subscriptions listing
// ABOUTME: Covers self-follow, duplicates, is_subscribed flags and recipes_limit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use common::create_test_app;
use foodgram::constants::error_messages;
use helpers::axum_test::AxumTestRequest;
use serde_json::Value;

#[tokio::test]
async fn test_subscribe_returns_author_with_recipes() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let reader = app.create_user("reader").await;
    let salt = app.create_ingredient("salt", "g").await;
    let author_token = app.token(&author);
    for name in ["One", "Two", "Three"] {
        app.create_recipe(&author_token, name, &[], &[(salt.id, 1)])
            .await;
    }

    let response = AxumTestRequest::post(&format!(
        "/api/users/{}/subscribe/?recipes_limit=2",
        author.id
    ))
    .bearer(&app.token(&reader))
    .send(app.router())
    .await;

    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    assert_eq!(body["id"], author.id);
    assert_eq!(body["username"], "chef");
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 3);
    let recipes = body["recipes"].as_array().unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0]["name"], "Three");
    assert!(recipes[0].get("text").is_none());
}

#[tokio::test]
async fn test_subscribe_rules() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let reader = app.create_user("reader").await;
    let token = app.token(&reader);

    let own = AxumTestRequest::post(&format!("/api/users/{}/subscribe/", reader.id))
        .bearer(&token)
        .send(app.router())
        .await;
    assert_eq!(own.status(), 400);
    let body: Value = own.json();
    assert_eq!(body["error"]["message"], error_messages::SELF_SUBSCRIPTION);

    let path = format!("/api/users/{}/subscribe/", author.id);
    AxumTestRequest::post(&path)
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let duplicate = AxumTestRequest::post(&path)
        .bearer(&token)
        .send(app.router())
        .await;
    assert_eq!(duplicate.status(), 400);
    let body: Value = duplicate.json();
    assert_eq!(body["error"]["message"], error_messages::ALREADY_SUBSCRIBED);

    let anonymous = AxumTestRequest::post(&path).send(app.router()).await;
    assert_eq!(anonymous.status(), 401);

    let missing = AxumTestRequest::post("/api/users/9999/subscribe/")
        .bearer(&token)
        .send(app.router())
        .await;
    assert_eq!(missing.status(), 404);

    let bad_limit = AxumTestRequest::post(&format!(
        "/api/users/{}/subscribe/?recipes_limit=lots",
        author.id
    ))
    .bearer(&token)
    .send(app.router())
    .await;
    assert_eq!(bad_limit.status(), 400);
}

#[tokio::test]
async fn test_unsubscribe() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let reader = app.create_user("reader").await;
    let token = app.token(&reader);
    let path = format!("/api/users/{}/subscribe/", author.id);

    let absent = AxumTestRequest::delete(&path)
        .bearer(&token)
        .send(app.router())
        .await;
    assert_eq!(absent.status(), 404);
    let body: Value = absent.json();
    assert_eq!(body["error"]["message"], error_messages::NOT_SUBSCRIBED);

    app.db().subscribe(reader.id, author.id).await.unwrap();
    let removed = AxumTestRequest::delete(&path)
        .bearer(&token)
        .send(app.router())
        .await;
    assert_eq!(removed.status(), 204);
    assert!(!app.db().is_subscribed(reader.id, author.id).await.unwrap());
}

#[tokio::test]
async fn test_two_readers_follow_same_author() {
    let app = create_test_app().await;
    let author = app.create_user("chef").await;
    let first = app.create_user("first").await;
    let second = app.create_user("second").await;
    let path = format!("/api/users/{}/subscribe/", author.id);

    for reader in [&first, &second] {
        AxumTestRequest::post(&path)
            .bearer(&app.token(reader))
            .send(app.router())
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    for reader in [&first, &second] {
        let profile: Value = AxumTestRequest::get(&format!("/api/users/{}/", author.id))
            .bearer(&app.token(reader))
            .send(app.router())
            .await
            .json();
        assert_eq!(profile["is_subscribed"], true);
    }

    let anonymous: Value = AxumTestRequest::get(&format!("/api/users/{}/", author.id))
        .send(app.router())
        .await
        .json();
    assert_eq!(anonymous["is_subscribed"], false);
}

#[tokio::test]
async fn test_subscriptions_listing() {
    let app = create_test_app().await;
    let reader = app.create_user("reader").await;
    let cook = app.create_user("cook").await;
    let baker = app.create_user("baker").await;
    app.create_user("stranger").await;
    let salt = app.create_ingredient("salt", "g").await;

    let cook_token = app.token(&cook);
    app.create_recipe(&cook_token, "Stew", &[], &[(salt.id, 1)])
        .await;
    app.create_recipe(&cook_token, "Roast", &[], &[(salt.id, 1)])
        .await;

    app.db().subscribe(reader.id, cook.id).await.unwrap();
    app.db().subscribe(reader.id, baker.id).await.unwrap();

    let token = app.token(&reader);
    let page: Value = AxumTestRequest::get("/api/users/subscriptions/?recipes_limit=1")
        .bearer(&token)
        .send(app.router())
        .await
        .json();
    assert_eq!(page["count"], 2);
    let results = page["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    let cook_entry = results.iter().find(|r| r["username"] == "cook").unwrap();
    assert_eq!(cook_entry["is_subscribed"], true);
    assert_eq!(cook_entry["recipes_count"], 2);
    assert_eq!(cook_entry["recipes"].as_array().unwrap().len(), 1);

    let baker_entry = results.iter().find(|r| r["username"] == "baker").unwrap();
    assert_eq!(baker_entry["recipes_count"], 0);
    assert!(baker_entry["recipes"].as_array().unwrap().is_empty());

    let listed: Value = AxumTestRequest::get("/api/users/")
        .bearer(&token)
        .send(app.router())
        .await
        .json();
    let flags: Vec<(String, bool)> = listed["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| {
            (
                u["username"].as_str().unwrap().to_owned(),
                u["is_subscribed"].as_bool().unwrap(),
            )
        })
        .collect();
    assert!(flags.contains(&("cook".to_owned(), true)));
    assert!(flags.contains(&("stranger".to_owned(), false)));

    let anonymous = AxumTestRequest::get("/api/users/subscriptions/")
        .send(app.router())
        .await;
    assert_eq!(anonymous.status(), 401);
}
