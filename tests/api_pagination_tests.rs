// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API pagination and query validation tests.
//!
//! These tests verify that:
//! 1. Pagination parameters are validated correctly
//! 2. Integer underflows/overflows are prevented
//! 3. Malformed reference instants are rejected

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn get(uri: &str, user_id: u64) -> axum::response::Response {
    let (app, state, _) = common::create_test_app();
    let token = common::create_test_jwt(user_id, &state.config.jwt_signing_key);

    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_pagination_underflow() {
    // page=0 would underflow (0-1) in vulnerable code
    let response = get("/api/activities?page=0&per_page=10", common::ALICE).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pagination_huge_page_is_not_an_error() {
    let uri = format!("/api/activities?page={}&per_page=100", u32::MAX);
    let response = get(&uri, common::ALICE).await;

    let status = response.status();
    assert!(
        status == StatusCode::OK || status == StatusCode::BAD_REQUEST,
        "Expected 200 or 400, got {}",
        status
    );
}

#[tokio::test]
async fn test_pagination_slices_newest_first() {
    let response = get("/api/activities?page=1&per_page=2", common::ALICE).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["per_page"], 2);
    let ids: Vec<u64> = body["activities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![100, 101]);

    let response = get("/api/activities?page=2&per_page=2", common::ALICE).await;
    let body = common::body_json(response).await;
    assert_eq!(body["activities"].as_array().unwrap().len(), 1);
    assert_eq!(body["activities"][0]["id"], 102);
}

#[tokio::test]
async fn test_per_page_is_clamped() {
    let response = get("/api/activities?per_page=5000", common::ALICE).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["per_page"], 100);
}

#[tokio::test]
async fn test_activity_filters() {
    let response = get("/api/activities?kind=meal", common::ALICE).await;
    let body = common::body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["activities"][0]["id"], 101);

    let response = get("/api/activities?status=pending", common::ALICE).await;
    let body = common::body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["activities"][0]["points"], 0);
}

#[tokio::test]
async fn test_unknown_status_filter_rejected() {
    let response = get("/api/activities?status=maybe", common::ALICE).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_at_rejects_invalid_rfc3339() {
    let response = get("/api/me/summary?at=not-a-date", common::ALICE).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get("/api/feed?at=2026-13-40", common::ALICE).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
