//! Client session adapter against a live server

use std::time::Duration;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use crate::common::{eventually, next_online, TestApp};
use xfchat::client::{
    ChatSession, ClientConfig, ClientError, ConnectionState, LoginData, ReconnectPolicy,
    SignupData,
};

fn session_for(app: &TestApp) -> ChatSession {
    let config = ClientConfig::new(app.http_url())
        .unwrap()
        .with_reconnect(ReconnectPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
        });
    ChatSession::new(config).unwrap()
}

fn signup_data(name: &str, email: &str) -> SignupData {
    SignupData {
        full_name: name.to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
    }
}

#[tokio::test]
async fn test_signup_connects_socket() {
    let app = TestApp::spawn().await;
    let session = session_for(&app);

    let user = session.signup(&signup_data("Ada", "ada@example.com")).await.unwrap();

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.auth_user.as_ref().map(|u| &u.id), Some(&user.id));
    assert!(!snapshot.is_signing_up);
    assert_eq!(snapshot.connection, ConnectionState::Connected);

    eventually(|| async { session.is_online(&user.id).await }).await;
    assert!(app.state.registry.is_online(&user.id).await);
}

#[tokio::test]
async fn test_connect_socket_is_idempotent() {
    let app = TestApp::spawn().await;
    let session = session_for(&app);
    let user = session.signup(&signup_data("Ada", "ada@example.com")).await.unwrap();

    let (mut observer, _) = app.connect("observer").await;

    session.connect_socket().await.unwrap();
    session.connect_socket().await.unwrap();

    assert_eq!(app.state.registry.len().await, 2);
    assert!(app.state.registry.is_online(&user.id).await);

    // No reconnect happened, so the observer sees no further presence change
    let quiet = tokio::time::timeout(Duration::from_millis(200), next_online(&mut observer)).await;
    assert!(quiet.is_err());
}

#[tokio::test]
async fn test_other_users_appear_in_online_set() {
    let app = TestApp::spawn().await;
    let session = session_for(&app);
    session.signup(&signup_data("Ada", "ada@example.com")).await.unwrap();

    let (_other, _) = app.connect("grace").await;

    eventually(|| async { session.online_users().await.len() == 2 }).await;
}

#[tokio::test]
async fn test_logout_disconnects_but_keeps_online_set() {
    let app = TestApp::spawn().await;
    let session = session_for(&app);
    let user = session.signup(&signup_data("Ada", "ada@example.com")).await.unwrap();
    eventually(|| async { session.is_online(&user.id).await }).await;

    session.logout().await.unwrap();

    let snapshot = session.snapshot().await;
    assert!(snapshot.auth_user.is_none());
    assert_eq!(snapshot.connection, ConnectionState::Disconnected);
    assert!(!snapshot.online_users.is_empty());

    eventually(|| async { !app.state.registry.is_online(&user.id).await }).await;
}

#[tokio::test]
async fn test_login_restores_session_in_new_client() {
    let app = TestApp::spawn().await;
    let first = session_for(&app);
    first.signup(&signup_data("Ada", "ada@example.com")).await.unwrap();
    first.disconnect_socket().await;

    let second = session_for(&app);
    let user = second
        .login(&LoginData {
            email: "ada@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

    assert!(!second.snapshot().await.is_logging_in);
    assert_eq!(second.connection_state().await, ConnectionState::Connected);

    let checked = second.check_auth().await.unwrap();
    assert_eq!(checked.id, user.id);
    assert!(!second.snapshot().await.is_checking_auth);
}

#[tokio::test]
async fn test_check_auth_without_session_clears_user() {
    let app = TestApp::spawn().await;
    let session = session_for(&app);

    let result = session.check_auth().await;
    assert_matches!(&result, Err(e) if e.is_unauthorized());

    let snapshot = session.snapshot().await;
    assert!(snapshot.auth_user.is_none());
    assert!(!snapshot.is_checking_auth);
    assert_eq!(snapshot.connection, ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_server_side_close_returns_to_disconnected() {
    let app = TestApp::spawn().await;
    let session = session_for(&app);
    session.signup(&signup_data("Ada", "ada@example.com")).await.unwrap();

    app.state.registry.shutdown().await;

    eventually(|| async { session.connection_state().await == ConnectionState::Disconnected })
        .await;
}

#[tokio::test]
async fn test_failed_login_reports_api_error() {
    let app = TestApp::spawn().await;
    let session = session_for(&app);

    let result = session
        .login(&LoginData {
            email: "nobody@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await;

    assert_err!(result, ClientError::Api { status: 400, .. });
    assert!(!session.snapshot().await.is_logging_in);
}

#[tokio::test]
async fn test_sent_message_reaches_other_session() {
    let app = TestApp::spawn().await;
    let ada = session_for(&app);
    let grace = session_for(&app);
    ada.signup(&signup_data("Ada", "ada@example.com")).await.unwrap();
    let grace_user = grace.signup(&signup_data("Grace", "grace@example.com")).await.unwrap();
    let mut inbox = grace.subscribe_messages();
    eventually(|| async { app.state.registry.is_online(&grace_user.id).await }).await;

    let sidebar = ada.api().users().await.unwrap();
    let names: Vec<_> = sidebar.iter().map(|u| u.full_name.as_str()).collect();
    assert_eq!(names, vec!["Grace"]);

    let sent = ada.api().send_message(&grace_user.id, "hi").await.unwrap();
    assert_eq!(sent.receiver_id, grace_user.id);

    let received = tokio::time::timeout(Duration::from_secs(5), inbox.recv())
        .await
        .expect("Timed out waiting for the message")
        .unwrap();
    assert_eq!(received, sent);
}

#[tokio::test]
async fn test_send_message_to_unknown_user() {
    let app = TestApp::spawn().await;
    let ada = session_for(&app);
    ada.signup(&signup_data("Ada", "ada@example.com")).await.unwrap();

    let nobody = xfchat::shared::UserId::parse("nobody").unwrap();
    let result = ada.api().send_message(&nobody, "hi").await;

    assert_err!(result, ClientError::Api { status: 404, .. });
}
