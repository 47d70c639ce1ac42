//! Messaging API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{signup_user, test_server};
use xfchat::shared::{AuthUser, DirectMessage};

#[tokio::test]
async fn test_sidebar_lists_everyone_but_caller() {
    let server = test_server();
    let ada = signup_user(&server, "Ada", "ada@example.com").await;
    signup_user(&server, "Grace", "grace@example.com").await;
    signup_user(&server, "Alan", "alan@example.com").await;

    let response = ada.with_cookie(server.get("/api/messages/users")).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let users: Vec<AuthUser> = response.json();
    let names: Vec<&str> = users.iter().map(|u| u.full_name.as_str()).collect();
    assert_eq!(names, vec!["Alan", "Grace"]);
}

#[tokio::test]
async fn test_sidebar_requires_auth() {
    let server = test_server();
    let response = server.get("/api/messages/users").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_send_message_to_offline_user() {
    let server = test_server();
    let ada = signup_user(&server, "Ada", "ada@example.com").await;
    let grace = signup_user(&server, "Grace", "grace@example.com").await;

    let response = ada
        .with_cookie(server.post(&format!("/api/messages/send/{}", grace.user.id)))
        .json(&json!({"text": "  hello there  "}))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["delivered"], false);

    let message: DirectMessage = response.json();
    assert_eq!(message.sender_id, ada.user.id);
    assert_eq!(message.receiver_id, grace.user.id);
    assert_eq!(message.text, "hello there");
}

#[tokio::test]
async fn test_send_message_validation() {
    let server = test_server();
    let ada = signup_user(&server, "Ada", "ada@example.com").await;
    let grace = signup_user(&server, "Grace", "grace@example.com").await;

    let empty = ada
        .with_cookie(server.post(&format!("/api/messages/send/{}", grace.user.id)))
        .json(&json!({"text": "   "}))
        .await;
    assert_eq!(empty.status_code(), StatusCode::BAD_REQUEST);

    let unknown = ada
        .with_cookie(server.post("/api/messages/send/nobody"))
        .json(&json!({"text": "hi"}))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}
