// SPDX-License-Identifier: MIT

//! Pagination parameter tests.
//!
//! Parameter validation happens before any database access, so the offline
//! mock db is enough.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn get_with_token(
    app: axum::Router,
    uri: &str,
    token: &str,
) -> axum::response::Response {
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
async fn test_page_zero_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::test_access_token(&state, "user-1");

    let response = get_with_token(app, "/api/activity?page=0", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_limit_zero_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::test_access_token(&state, "user-1");

    let response = get_with_token(app, "/api/activity?limit=0", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_default_parameters_reach_the_db() {
    let (app, state) = common::create_test_app();
    let token = common::test_access_token(&state, "user-1");

    // Defaults are valid; the request proceeds to the (offline) db
    let response = get_with_token(app, "/api/activity", &token).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_huge_page_number_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::test_access_token(&state, "user-1");

    let uri = format!("/api/activity?page={}&limit=100", u32::MAX);
    let response = get_with_token(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sessions_list_validates_pagination() {
    let (app, state) = common::create_test_app();
    let token = common::test_access_token(&state, "user-1");

    let response = get_with_token(app, "/api/workout/sessions?page=0", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
