//! Realtime presence over a live listener
//!
//! Each test opens real WebSocket connections with `tokio-tungstenite` and
//! checks the `getOnlineUsers` broadcasts the clients receive.

use futures_util::SinkExt;
use serde_json::json;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::common::{close, eventually, expect_close, next_event, next_online, TestApp};
use xfchat::backend::realtime::registry::CLOSE_SUPERSEDED;
use xfchat::shared::{ServerEvent, UserId};

fn uid(raw: &str) -> UserId {
    UserId::parse(raw).unwrap()
}

#[tokio::test]
async fn test_single_user_sees_itself() {
    let app = TestApp::spawn().await;

    let (_ws, online) = app.connect("u1").await;
    assert_online!(online, ["u1"]);
    assert!(app.state.registry.is_online(&uid("u1")).await);
}

#[tokio::test]
async fn test_second_user_is_broadcast_to_everyone() {
    let app = TestApp::spawn().await;

    let (mut ws1, _) = app.connect("u1").await;
    let (_ws2, online2) = app.connect("u2").await;

    assert_online!(online2, ["u1", "u2"]);
    let online1 = next_online(&mut ws1).await;
    assert_online!(online1, ["u1", "u2"]);
}

#[tokio::test]
async fn test_disconnect_is_broadcast() {
    let app = TestApp::spawn().await;

    let (mut ws1, _) = app.connect("u1").await;
    let (ws2, _) = app.connect("u2").await;
    next_online(&mut ws1).await;

    close(ws2).await;

    let online1 = next_online(&mut ws1).await;
    assert_online!(online1, ["u1"]);
    assert!(!app.state.registry.is_online(&uid("u2")).await);
}

#[tokio::test]
async fn test_dropped_transport_counts_as_disconnect() {
    let app = TestApp::spawn().await;

    let (mut ws1, _) = app.connect("u1").await;
    let (ws2, _) = app.connect("u2").await;
    next_online(&mut ws1).await;

    drop(ws2);

    let online1 = next_online(&mut ws1).await;
    assert_online!(online1, ["u1"]);
}

#[tokio::test]
async fn test_handshake_without_user_id_is_rejected() {
    let app = TestApp::spawn().await;

    let missing = connect_async(format!("ws://{}/ws", app.addr)).await;
    match missing {
        Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), 400),
        other => panic!("Expected HTTP 400 rejection, got {:?}", other.map(|_| ())),
    }

    let undefined = connect_async(app.ws_url("undefined")).await;
    assert!(matches!(undefined, Err(WsError::Http(_))));

    assert!(app.state.registry.is_empty().await);
}

#[tokio::test]
async fn test_reconnect_supersedes_old_connection() {
    let app = TestApp::spawn().await;

    let (mut old, _) = app.connect("u1").await;
    let (mut new, online) = app.connect("u1").await;
    assert_online!(online, ["u1"]);

    let frame = expect_close(&mut old).await.expect("Expected a close frame");
    assert_eq!(u16::from(frame.code), CLOSE_SUPERSEDED);

    // The stale disconnect must not take the new connection offline
    close_quietly(old).await;
    let online = next_online(&mut new).await;
    assert_online!(online, ["u1"]);
    assert_eq!(app.state.registry.len().await, 1);
}

#[tokio::test]
async fn test_superseded_peer_that_never_answers_is_dropped() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let app = TestApp::spawn().await;

    // Raw upgrade that never reads frames or answers the close handshake
    let mut raw = tokio::net::TcpStream::connect(app.addr).await.unwrap();
    raw.write_all(
        b"GET /ws?userId=u1 HTTP/1.1\r\n\
          Host: localhost\r\n\
          Connection: Upgrade\r\n\
          Upgrade: websocket\r\n\
          Sec-WebSocket-Version: 13\r\n\
          Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\r\n",
    )
    .await
    .unwrap();
    eventually(|| async { app.state.registry.is_online(&uid("u1")).await }).await;

    let (_new, online) = app.connect("u1").await;
    assert_online!(online, ["u1"]);

    let mut buf = [0u8; 1024];
    let drained = tokio::time::timeout(crate::common::FRAME_TIMEOUT, async {
        loop {
            match raw.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => continue,
            }
        }
    })
    .await;

    assert!(drained.is_ok(), "old socket was never dropped by the server");
    assert!(app.state.registry.is_online(&uid("u1")).await);
}

async fn close_quietly(mut ws: crate::common::WsClient) {
    let _ = ws.close(None).await;
}

#[tokio::test]
async fn test_client_frames_are_ignored() {
    let app = TestApp::spawn().await;

    let (mut ws1, _) = app.connect("u1").await;
    ws1.send(tokio_tungstenite::tungstenite::Message::Text(
        json!({"event": "hello"}).to_string().into(),
    ))
    .await
    .unwrap();

    let (_ws2, _) = app.connect("u2").await;
    let online = next_online(&mut ws1).await;
    assert_online!(online, ["u1", "u2"]);
}

#[tokio::test]
async fn test_direct_message_is_pushed_to_online_receiver() {
    let app = TestApp::spawn().await;
    let http = reqwest::Client::builder().cookie_store(true).build().unwrap();

    let signup = |name: &'static str, email: &'static str| {
        let http = http.clone();
        let url = format!("{}/api/auth/signup", app.http_url());
        async move {
            http.post(url)
                .json(&json!({"fullName": name, "email": email, "password": "password123"}))
                .send()
                .await
                .unwrap()
                .json::<xfchat::shared::AuthUser>()
                .await
                .unwrap()
        }
    };

    let grace = signup("Grace", "grace@example.com").await;
    let ada = signup("Ada", "ada@example.com").await;

    let (mut grace_ws, _) = app.connect(grace.id.as_str()).await;

    // The cookie store now holds Ada's session
    let response = http
        .post(format!("{}/api/messages/send/{}", app.http_url(), grace.id))
        .json(&json!({"text": "hi grace"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    match next_event(&mut grace_ws).await {
        ServerEvent::NewMessage(message) => {
            assert_eq!(message.sender_id, ada.id);
            assert_eq!(message.text, "hi grace");
        }
        other => panic!("Expected newMessage, got {:?}", other),
    }
}

#[tokio::test]
async fn test_shutdown_closes_every_connection() {
    let app = TestApp::spawn().await;

    let (mut ws1, _) = app.connect("u1").await;
    let (mut ws2, _) = app.connect("u2").await;
    next_online(&mut ws1).await;

    app.state.registry.shutdown().await;

    assert!(expect_close(&mut ws1).await.is_some());
    assert!(expect_close(&mut ws2).await.is_some());
    eventually(|| async { app.state.registry.is_empty().await }).await;
}
