//! Live server helpers
//!
//! Spawns the real router on `127.0.0.1:0` so tests can open WebSockets and
//! make HTTP calls against it.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use xfchat::backend::server::{config::ServerConfig, init::create_app, state::AppState};
use xfchat::shared::{ServerEvent, UserId};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long to wait for any expected frame
pub const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for tests: cheap bcrypt, no CORS, no static files
pub fn test_config() -> ServerConfig {
    ServerConfig {
        bcrypt_cost: 4,
        client_origin: None,
        static_dir: None,
        jwt_secret: "test-secret".to_string(),
        ..ServerConfig::default()
    }
}

/// Running server bound to an ephemeral port
pub struct TestApp {
    pub addr: SocketAddr,
    pub state: AppState,
    handle: JoinHandle<()>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    pub async fn spawn_with(config: ServerConfig) -> Self {
        let (app, state) = create_app(config);
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self { addr, state, handle }
    }

    pub fn http_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, user_id: &str) -> String {
        format!("ws://{}/ws?userId={}", self.addr, user_id)
    }

    /// Open a socket for `user_id` and wait for its own presence broadcast
    pub async fn connect(&self, user_id: &str) -> (WsClient, Vec<UserId>) {
        let (mut ws, _) = connect_async(self.ws_url(user_id))
            .await
            .expect("WebSocket handshake failed");
        let online = next_online(&mut ws).await;
        (ws, online)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Next server event, skipping control frames
pub async fn next_event(ws: &mut WsClient) -> ServerEvent {
    loop {
        let frame = tokio::time::timeout(FRAME_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Socket closed while waiting for a frame")
            .expect("Socket error while waiting for a frame");

        match frame {
            Message::Text(text) => {
                return ServerEvent::from_json(text.as_str()).expect("Malformed server event")
            }
            Message::Close(frame) => panic!("Unexpected close frame: {:?}", frame),
            _ => continue,
        }
    }
}

/// Next `getOnlineUsers` payload; other events are skipped
pub async fn next_online(ws: &mut WsClient) -> Vec<UserId> {
    loop {
        if let ServerEvent::OnlineUsers(users) = next_event(ws).await {
            return users;
        }
    }
}

/// Wait for the server's close frame, skipping anything before it
pub async fn expect_close(ws: &mut WsClient) -> Option<CloseFrame> {
    loop {
        let frame = tokio::time::timeout(FRAME_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for close");
        match frame {
            Some(Ok(Message::Close(frame))) => return frame,
            Some(Ok(_)) => continue,
            Some(Err(_)) | None => return None,
        }
    }
}

/// Close the socket from the client side
pub async fn close(mut ws: WsClient) {
    let _ = ws.close(None).await;
    // Drain until the server acknowledges so its reader loop has finished
    while let Ok(Some(Ok(_))) = tokio::time::timeout(FRAME_TIMEOUT, ws.next()).await {}
}

/// Poll `check` until it holds or the frame timeout passes
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + FRAME_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Condition not reached before timeout");
}
