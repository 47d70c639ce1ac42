/**
 * Realtime Socket Handler
 *
 * Implements `GET /ws?userId=<id>`, the WebSocket endpoint that binds a
 * connection to a user and keeps the presence registry current.
 *
 * # Handshake
 *
 * The `userId` query parameter is parsed into a `UserId` before the upgrade.
 * A missing or malformed id is answered with 400 and the connection is never
 * upgraded or registered.
 *
 * # Connection Lifecycle
 *
 * Each accepted socket runs as a small actor:
 * - a writer task owns the sink and drains the connection's `Outbound` queue
 * - the reader loop watches for close frames and transport errors, and
 *   stops as soon as the writer task finishes or the connection is evicted
 *
 * On connect the handle is registered (replacing and closing any older
 * connection for the same user). When the reader loop ends, for any reason,
 * the connection is unregistered and the remaining clients get a fresh
 * presence list.
 */

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::backend::error::BackendError;
use crate::backend::realtime::registry::{
    ConnectionHandle, ConnectionRegistry, Outbound, CLOSE_SUPERSEDED,
};
use crate::shared::UserId;

/// Query parameters of the socket handshake
#[derive(Debug, Deserialize)]
pub struct HandshakeQuery {
    /// Id of the authenticated user opening the socket
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl HandshakeQuery {
    /// Validate the handshake parameters
    pub fn user_id(&self) -> Result<UserId, BackendError> {
        let raw = self
            .user_id
            .as_deref()
            .ok_or_else(|| BackendError::handshake("userId query parameter is required"))?;
        UserId::parse(raw).map_err(|e| BackendError::handshake(e.detail()))
    }
}

/// GET /ws?userId=<id>
pub async fn ws_upgrade(
    State(registry): State<ConnectionRegistry>,
    Query(query): Query<HandshakeQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, BackendError> {
    let user_id = query.user_id().map_err(|e| {
        tracing::warn!("[Socket] Handshake rejected: {}", e.message());
        e
    })?;

    tracing::info!(user_id = %user_id, "[Socket] Handshake accepted");
    Ok(ws.on_upgrade(move |socket| run_connection(socket, registry, user_id)))
}

/// Drive one socket from registration to cleanup
pub async fn run_connection(socket: WebSocket, registry: ConnectionRegistry, user_id: UserId) {
    let (ws_sender, mut ws_receiver) = socket.split();
    let (handle, rx) = ConnectionHandle::channel();
    let connection_id = handle.id();

    let mut writer_handle = tokio::spawn(writer_task(ws_sender, rx));

    if let Some(previous) = registry.register(user_id.clone(), handle.clone()).await {
        tracing::info!(
            user_id = %user_id,
            previous = %previous.id(),
            "[Socket] Closing superseded connection"
        );
        if let Err(e) = previous.close(CLOSE_SUPERSEDED, "session superseded") {
            tracing::debug!(user_id = %user_id, "[Socket] Superseded connection not closed cleanly: {}", e);
        }
    }

    tracing::info!(user_id = %user_id, connection_id = %connection_id, "[Socket] Connection started");

    loop {
        tokio::select! {
            _ = handle.evicted() => {
                tracing::warn!(user_id = %user_id, "[Socket] Connection evicted");
                break;
            }
            _ = &mut writer_handle => {
                tracing::info!(user_id = %user_id, "[Socket] Writer finished");
                break;
            }
            frame = ws_receiver.next() => match frame {
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(user_id = %user_id, reason = ?frame, "[Socket] Client initiated close");
                    break;
                }
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!(
                        user_id = %user_id,
                        "[Socket] Ignoring client text frame: {}",
                        text.chars().take(100).collect::<String>()
                    );
                }
                Some(Ok(Message::Binary(_))) => {
                    tracing::debug!(user_id = %user_id, "[Socket] Ignoring client binary frame");
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {}
                Some(Err(e)) => {
                    tracing::warn!(user_id = %user_id, error = %e, "[Socket] Receive error");
                    break;
                }
                None => {
                    tracing::info!(user_id = %user_id, "[Socket] Stream ended");
                    break;
                }
            },
        }
    }

    registry.unregister_connection(&user_id, connection_id).await;
    drop(handle);
    writer_handle.abort();

    tracing::info!(user_id = %user_id, connection_id = %connection_id, "[Socket] Connection stopped");
}

/// Forward queued frames to the socket until the queue closes or a send fails
async fn writer_task(
    mut ws_sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Outbound>,
) {
    while let Some(outbound) = rx.recv().await {
        let message = match outbound {
            Outbound::Event(event) => match event.to_json() {
                Ok(json) => Message::Text(json.into()),
                Err(e) => {
                    tracing::error!("[Socket] Failed to encode {} event: {}", event.name(), e);
                    continue;
                }
            },
            Outbound::Close { code, reason } => {
                if let Err(e) = ws_sender
                    .send(Message::Close(Some(CloseFrame {
                        code,
                        reason: reason.into(),
                    })))
                    .await
                {
                    tracing::debug!("[Socket] Close frame not sent: {}", e);
                }
                break;
            }
        };

        if ws_sender.send(message).await.is_err() {
            break;
        }
    }
}
