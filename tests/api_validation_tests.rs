// SPDX-License-Identifier: MIT

//! Request validation tests.
//!
//! Validation happens before any database access, so these run entirely
//! against the offline mock db.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_signup_rejects_invalid_email() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/signup",
            None,
            json!({
                "email": "not-an-email",
                "password": "secret123",
                "first_name": "Ada",
                "last_name": "Lovelace"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    let errors = body["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .any(|e| e.as_str().unwrap().starts_with("email:")));
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/signup",
            None,
            json!({
                "email": "ada@example.com",
                "password": "short",
                "first_name": "Ada",
                "last_name": "Lovelace"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    let errors = body["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .any(|e| e.as_str().unwrap().starts_with("password:")));
}

#[tokio::test]
async fn test_water_amount_must_be_positive() {
    let (app, state) = common::create_test_app();
    let token = common::test_access_token(&state, "user-1");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/nutrition/water",
            Some(&token),
            json!({ "amount": -100.0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_meal_requires_foods() {
    let (app, state) = common::create_test_app();
    let token = common::test_access_token(&state, "user-1");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/nutrition/meals",
            Some(&token),
            json!({ "type": "breakfast", "foods": [] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_activity_type_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::test_access_token(&state, "user-1");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/activity",
            Some(&token),
            json!({
                "type": "teleportation",
                "name": "Morning teleport",
                "duration": 30.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("teleportation"));
}

#[tokio::test]
async fn test_gps_upload_requires_coordinates() {
    let (app, state) = common::create_test_app();
    let token = common::test_access_token(&state, "user-1");

    // Empty track is rejected before the activity is even looked up
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/activity/a1/gps",
            Some(&token),
            json!({ "coordinates": [] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("coordinates"));
}

#[tokio::test]
async fn test_bulk_update_requires_user_ids() {
    let (app, state) = common::create_test_app();
    let token = common::test_admin_token(&state, "admin-1");

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/api/admin/users/bulk",
            Some(&token),
            json!({ "user_ids": [], "action": "activate" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("user_ids"));
}

#[tokio::test]
async fn test_bulk_role_change_requires_value() {
    let (app, state) = common::create_test_app();
    let token = common::test_admin_token(&state, "admin-1");

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/api/admin/users/bulk",
            Some(&token),
            json!({ "user_ids": ["u1"], "action": "changeRole" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bulk_update_rejects_unknown_action() {
    let (app, state) = common::create_test_app();
    let token = common::test_admin_token(&state, "admin-1");

    // "promote" is not a bulk action; serde rejects it before the handler
    let response = app
        .oneshot(json_request(
            "PATCH",
            "/api/admin/users/bulk",
            Some(&token),
            json!({ "user_ids": ["u1"], "action": "promote" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_invalid_nutrition_date_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::test_access_token(&state, "user-1");

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/nutrition/daily?date=not-a-date")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_close_requires_known_status() {
    let (app, state) = common::create_test_app();
    let token = common::test_access_token(&state, "user-1");

    // "paused" is not a session status; serde rejects it before the handler
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/workout/sessions",
            Some(&token),
            json!({ "session_id": "s1", "status": "paused" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
