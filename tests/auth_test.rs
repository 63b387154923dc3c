mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::json;

use common::TestApp;

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": email, "password": password }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn login_returns_a_usable_token() {
    let app = TestApp::new();

    let (status, json) = app
        .send(login_request("seller@example.com", "sellerpass"))
        .await;

    assert_eq!(status, StatusCode::OK);
    let token = json["token"].as_str().unwrap();

    let (status, _) = app
        .send(common::get_request("/seller/products", Some(token)))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new();

    let (status, _) = app
        .send(login_request("seller@example.com", "wrong"))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_email_is_unauthorized() {
    let app = TestApp::new();

    let (status, _) = app.send(login_request("nobody@example.com", "x")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = TestApp::new();

    let (status, _) = app
        .send(common::get_request("/seller/products", Some("not-a-jwt")))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_endpoints_are_public() {
    let app = TestApp::new();

    let (status, json) = app.send(common::get_request("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");

    let (status, json) = app.send(common::get_request("/health/ready", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ready");
}
