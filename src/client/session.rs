/**
 * Client Session Adapter
 *
 * Holds the authenticated user and at most one realtime socket. The socket is
 * a small state machine:
 *
 * ```text
 * Disconnected -> Connecting -> Connected -> Disconnected
 * ```
 *
 * `connect_socket` is a no-op without an authenticated user or while a socket
 * is already connecting or connected. A reader task applies `getOnlineUsers`
 * payloads to the local online set and forwards `newMessage` pushes to
 * subscribers. When the transport fails the reader task exits and the state
 * returns to `Disconnected`; the online set is kept as last seen.
 *
 * The auth operations mirror a typical frontend store: successful signup,
 * login or session check stores the user and opens the socket, logout clears
 * the user and closes it.
 */

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::client::api::{ApiClient, LoginData, SignupData};
use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::shared::{AuthUser, DirectMessage, ServerEvent, UserId};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Capacity of the direct message fan-out to subscribers
const MESSAGE_CHANNEL_CAPACITY: usize = 64;

/// Realtime socket state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Point-in-time view of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub auth_user: Option<AuthUser>,
    pub is_signing_up: bool,
    pub is_logging_in: bool,
    pub is_checking_auth: bool,
    pub connection: ConnectionState,
    pub online_users: Vec<UserId>,
}

struct SocketTask {
    generation: u64,
    close_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct SessionInner {
    snapshot: SessionSnapshot,
    socket: Option<SocketTask>,
    generation: u64,
}

/// Client session: auth state plus the realtime socket
pub struct ChatSession {
    api: ApiClient,
    inner: Arc<RwLock<SessionInner>>,
    messages: broadcast::Sender<DirectMessage>,
}

impl ChatSession {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let (messages, _) = broadcast::channel(MESSAGE_CHANNEL_CAPACITY);
        Ok(Self {
            api: ApiClient::new(config)?,
            inner: Arc::new(RwLock::new(SessionInner::default())),
            messages,
        })
    }

    /// Underlying API client (shares the session cookie)
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().await.snapshot.clone()
    }

    pub async fn auth_user(&self) -> Option<AuthUser> {
        self.inner.read().await.snapshot.auth_user.clone()
    }

    pub async fn connection_state(&self) -> ConnectionState {
        self.inner.read().await.snapshot.connection
    }

    pub async fn online_users(&self) -> Vec<UserId> {
        self.inner.read().await.snapshot.online_users.clone()
    }

    pub async fn is_online(&self, user_id: &UserId) -> bool {
        self.inner
            .read()
            .await
            .snapshot
            .online_users
            .contains(user_id)
    }

    /// Receive direct messages pushed over the socket
    pub fn subscribe_messages(&self) -> broadcast::Receiver<DirectMessage> {
        self.messages.subscribe()
    }

    /// Adopt a user restored from elsewhere without calling the server
    pub async fn set_auth_user(&self, user: Option<AuthUser>) {
        self.inner.write().await.snapshot.auth_user = user;
    }

    /// Restore the session from the cookie
    ///
    /// Clears the user when the server does not recognize the session.
    pub async fn check_auth(&self) -> Result<AuthUser, ClientError> {
        self.inner.write().await.snapshot.is_checking_auth = true;

        let result = self.api.check_auth().await;
        {
            let mut inner = self.inner.write().await;
            inner.snapshot.auth_user = result.as_ref().ok().cloned();
            inner.snapshot.is_checking_auth = false;
        }

        match result {
            Ok(user) => {
                self.connect_after_auth().await;
                Ok(user)
            }
            Err(e) => {
                tracing::debug!("[Client] Session check failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn signup(&self, data: &SignupData) -> Result<AuthUser, ClientError> {
        self.inner.write().await.snapshot.is_signing_up = true;

        let result = self.api.signup(data).await;
        {
            let mut inner = self.inner.write().await;
            if let Ok(user) = &result {
                inner.snapshot.auth_user = Some(user.clone());
            }
            inner.snapshot.is_signing_up = false;
        }

        let user = result?;
        tracing::info!(user_id = %user.id, "[Client] Account created");
        self.connect_after_auth().await;
        Ok(user)
    }

    pub async fn login(&self, data: &LoginData) -> Result<AuthUser, ClientError> {
        self.inner.write().await.snapshot.is_logging_in = true;

        let result = self.api.login(data).await;
        {
            let mut inner = self.inner.write().await;
            if let Ok(user) = &result {
                inner.snapshot.auth_user = Some(user.clone());
            }
            inner.snapshot.is_logging_in = false;
        }

        let user = result?;
        tracing::info!(user_id = %user.id, "[Client] Logged in");
        self.connect_after_auth().await;
        Ok(user)
    }

    /// Clear the session on the server, then locally, then close the socket
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.api.logout().await?;
        self.inner.write().await.snapshot.auth_user = None;
        self.disconnect_socket().await;
        tracing::info!("[Client] Logged out");
        Ok(())
    }

    async fn connect_after_auth(&self) {
        if let Err(e) = self.connect_socket().await {
            tracing::warn!("[Client] Realtime socket unavailable: {}", e);
        }
    }

    /// Open the realtime socket for the authenticated user
    ///
    /// No-op when nobody is logged in or a socket is already connecting or
    /// connected. Retries per the configured `ReconnectPolicy` and returns
    /// `ReconnectExhausted` once the budget is spent.
    pub async fn connect_socket(&self) -> Result<(), ClientError> {
        let user_id = {
            let mut inner = self.inner.write().await;
            let Some(user) = inner.snapshot.auth_user.as_ref() else {
                return Ok(());
            };
            if inner.snapshot.connection != ConnectionState::Disconnected {
                return Ok(());
            }
            let user_id = user.id.clone();
            inner.snapshot.connection = ConnectionState::Connecting;
            user_id
        };

        let socket = match self.open_with_retry(&user_id).await {
            Ok(socket) => socket,
            Err(e) => {
                let mut inner = self.inner.write().await;
                if inner.snapshot.connection == ConnectionState::Connecting {
                    inner.snapshot.connection = ConnectionState::Disconnected;
                }
                return Err(e);
            }
        };

        let mut inner = self.inner.write().await;
        let still_wanted = inner.snapshot.connection == ConnectionState::Connecting
            && inner.snapshot.auth_user.as_ref().map(|u| &u.id) == Some(&user_id);
        if !still_wanted {
            drop(inner);
            tracing::debug!("[Client] Socket opened after disconnect was requested, closing");
            let mut socket = socket;
            let _ = socket.close(None).await;
            return Ok(());
        }

        inner.generation += 1;
        let generation = inner.generation;
        let (close_tx, close_rx) = oneshot::channel();
        let handle = tokio::spawn(read_loop(
            socket,
            close_rx,
            generation,
            Arc::clone(&self.inner),
            self.messages.clone(),
        ));

        inner.socket = Some(SocketTask {
            generation,
            close_tx,
            handle,
        });
        inner.snapshot.connection = ConnectionState::Connected;

        tracing::info!(user_id = %user_id, "[Client] Realtime socket connected");
        Ok(())
    }

    /// Close the realtime socket; the last known online set is kept
    pub async fn disconnect_socket(&self) {
        let task = {
            let mut inner = self.inner.write().await;
            inner.snapshot.connection = ConnectionState::Disconnected;
            inner.socket.take()
        };

        if let Some(task) = task {
            let _ = task.close_tx.send(());
            if let Err(e) = task.handle.await {
                tracing::warn!("[Client] Socket task ended abnormally: {}", e);
            }
            tracing::info!("[Client] Realtime socket disconnected");
        }
    }

    async fn open_with_retry(&self, user_id: &UserId) -> Result<Socket, ClientError> {
        let url = self.api.config().socket_url(user_id)?;
        let policy = *self.api.config().reconnect();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match connect_async(url.as_str()).await {
                Ok((socket, _response)) => return Ok(socket),
                Err(tungstenite::Error::Http(response)) if response.status().is_client_error() => {
                    let status = response.status().as_u16();
                    tracing::warn!(status, "[Client] Socket handshake rejected");
                    return Err(ClientError::HandshakeRejected { status });
                }
                Err(e) => {
                    if !policy.should_retry(attempt) {
                        tracing::warn!(attempts = attempt, "[Client] Giving up on socket: {}", e);
                        return Err(ClientError::ReconnectExhausted {
                            attempts: attempt,
                            last_error: e.to_string(),
                        });
                    }
                    let delay = policy.delay_for(attempt);
                    tracing::debug!(attempt, ?delay, "[Client] Socket connect failed: {}", e);
                    tokio::time::sleep(delay).await;

                    if self.inner.read().await.snapshot.connection != ConnectionState::Connecting {
                        return Err(ClientError::NotAuthenticated);
                    }
                }
            }
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_write() {
            if let Some(task) = inner.socket.take() {
                let _ = task.close_tx.send(());
            }
        }
    }
}

/// Reader task for one socket generation
async fn read_loop(
    mut socket: Socket,
    mut close_rx: oneshot::Receiver<()>,
    generation: u64,
    inner: Arc<RwLock<SessionInner>>,
    messages: broadcast::Sender<DirectMessage>,
) {
    loop {
        tokio::select! {
            _ = &mut close_rx => {
                if let Err(e) = socket.close(None).await {
                    tracing::debug!("[Client] Close handshake failed: {}", e);
                }
                break;
            }
            frame = socket.next() => match frame {
                Some(Ok(Message::Text(text))) => match ServerEvent::from_json(text.as_str()) {
                    Ok(ServerEvent::OnlineUsers(users)) => {
                        tracing::debug!(count = users.len(), "[Client] Online users updated");
                        inner.write().await.snapshot.online_users = users;
                    }
                    Ok(ServerEvent::NewMessage(message)) => {
                        let _ = messages.send(message);
                    }
                    Err(e) => tracing::warn!("[Client] Ignoring malformed event: {}", e),
                },
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(?frame, "[Client] Server closed the socket");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("[Client] Socket error: {}", e);
                    break;
                }
                None => break,
            },
        }
    }

    let mut inner = inner.write().await;
    if inner.socket.as_ref().map(|task| task.generation) == Some(generation) {
        inner.socket = None;
        inner.snapshot.connection = ConnectionState::Disconnected;
    }
}
