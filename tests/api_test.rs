mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::setup;
use liftdesk::{api, config::Settings, domain::Role};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

async fn test_app() -> anyhow::Result<Router> {
    let ctx = setup().await?;
    Ok(api::create_app(
        Arc::new(ctx),
        Arc::new(Settings::default()),
    ))
}

async fn body_json(response: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn register(app: &Router, email: &str) -> anyhow::Result<String> {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            json!({
                "name": "Alex",
                "email": email,
                "password": "secure_password123"
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await?;
    assert_eq!(body["success"], json!(true));
    Ok(body["token"].as_str().expect("token in body").to_string())
}

#[tokio::test]
async fn register_and_login_round_trip() -> anyhow::Result<()> {
    let app = test_app().await?;

    register(&app, "member@example.com").await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({"email": "member@example.com", "password": "secure_password123"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["success"], json!(true));
    assert!(body["token"].is_string());

    // Wrong password comes back through the error envelope.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({"email": "member@example.com", "password": "wrong-password"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await?;
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].is_string());

    Ok(())
}

#[tokio::test]
async fn api_routes_require_a_bearer_token() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/packages")
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = register(&app, "member@example.com").await?;
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/packages", &token))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["success"], json!(true));
    assert!(body["packages"].is_array());

    Ok(())
}

#[tokio::test]
async fn malformed_authorization_headers_are_rejected() -> anyhow::Result<()> {
    let app = test_app().await?;

    for value in ["Basic dXNlcjpwYXNz", "Bearer", "not-even-a-scheme"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/packages")
                    .header(header::AUTHORIZATION, value)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // A well-formed header with a garbage token fails verification.
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/packages", "not-a-jwt"))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await?;
    assert_eq!(body["success"], json!(false));

    Ok(())
}

#[tokio::test]
async fn staff_routes_reject_plain_members() -> anyhow::Result<()> {
    let app = test_app().await?;

    let token = register(&app, "member@example.com").await?;
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/memberships", &token))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn room_management_is_admin_only() -> anyhow::Result<()> {
    let app = test_app().await?;

    let token = register(&app, "member@example.com").await?;

    // Members may browse the room list.
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/rooms", &token))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["success"], json!(true));
    assert!(body["rooms"].is_array());

    // But cannot create rooms.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/rooms")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"name": "Studio B"}).to_string()))
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn privileged_registration_requires_an_admin_token() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            json!({
                "name": "Wannabe",
                "email": "staff@example.com",
                "password": "secure_password123",
                "role": Role::Staff
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn health_endpoint_is_public() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["status"], json!("healthy"));

    Ok(())
}
