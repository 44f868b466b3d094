mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{request_json, send, test_app, SECRET};
use serde_json::json;
use vetclinic_api::auth::TokenIssuer;

async fn register(app: &axum::Router) {
    let (status, env) = request_json(
        app,
        "POST",
        "/api/auth/register",
        Some(json!({"username": "ana", "email": "ana@clinic.test", "password": "s3cret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(env["data"]["username"], json!("ana"));
    assert!(env["data"]["id"].is_i64());
    assert!(env["data"].get("password").is_none());
}

#[tokio::test]
async fn login_issues_a_token_for_the_user() {
    let (app, _) = test_app();
    register(&app).await;

    let (status, env) = request_json(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({"email": "ana@clinic.test", "password": "s3cret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(env["data"]["user"], json!({"id": 1, "username": "ana", "email": "ana@clinic.test"}));

    let token = env["data"]["token"].as_str().unwrap();
    let claims = TokenIssuer::new(SECRET, chrono::Duration::hours(1)).verify(token).unwrap();
    assert_eq!(claims.id, 1);
    assert_eq!(claims.username, "ana");
    assert_eq!(claims.exp - claims.iat, 3600);

    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, env) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(env["data"]["username"], json!("ana"));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_distinct() {
    let (app, _) = test_app();
    register(&app).await;

    let (status, env) = request_json(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({"email": "ana@clinic.test", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(env["message"], json!("Wrong password."));

    let (status, env) = request_json(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({"email": "bob@clinic.test", "password": "s3cret"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(env["message"], json!("Email not found."));
}

#[tokio::test]
async fn duplicate_email_is_reported_as_duplicate_record() {
    let (app, _) = test_app();
    register(&app).await;
    let (status, env) = request_json(
        &app,
        "POST",
        "/api/auth/register",
        Some(json!({"username": "ana2", "email": "ana@clinic.test", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(env["message"], json!("A record with this data already exists."));
}

#[tokio::test]
async fn register_requires_all_fields() {
    let (app, store) = test_app();
    let (status, env) = request_json(&app, "POST", "/api/auth/register", Some(json!({"email": "a@b.c"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(env["success"], json!(false));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let (app, _) = test_app();
    let (status, env) = request_json(&app, "GET", "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(env["success"], json!(false));
}
