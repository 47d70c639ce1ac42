/**
 * Connection Registry
 *
 * Maps each online user to exactly one live socket connection. The registry
 * is constructed once in `create_app`, shared through `AppState`, and drained
 * by `shutdown()` when the server stops.
 *
 * # Mutations
 *
 * Every mutating call (`register`, `unregister`, `unregister_connection`,
 * `shutdown`) takes the write lock, applies the change, and emits exactly one
 * presence broadcast before releasing the lock. Broadcasts therefore go out in
 * mutation order and each payload equals the key set at that instant.
 *
 * Sends are non-blocking pushes into bounded per-connection channels, so
 * holding the lock during a broadcast never waits on network I/O. A
 * connection that stops reading fills its queue and is evicted.
 *
 * # Reconnects
 *
 * `register` on a user that already has a connection replaces it and returns
 * the old handle. The socket layer removes its entry with
 * `unregister_connection`, which only deletes the mapping when the stored
 * handle is still its own, so a late disconnect from a replaced socket cannot
 * evict the newer one.
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{Notify, RwLock};
use uuid::Uuid;

use crate::backend::realtime::broadcast::{BroadcastReport, PresenceBroadcaster};
use crate::shared::{ServerEvent, UserId};

/// Identifier assigned to each accepted socket
pub type ConnectionId = Uuid;

/// Close code sent to a connection replaced by a newer one for the same user
pub const CLOSE_SUPERSEDED: u16 = 4000;

/// Close code sent to every connection when the server shuts down
pub const CLOSE_GOING_AWAY: u16 = 1001;

/// Frame queued for a connection's writer task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A server event, written as a JSON text frame
    Event(ServerEvent),
    /// Close the socket with the given code and reason
    Close {
        /// WebSocket close code
        code: u16,
        /// Close reason
        reason: String,
    },
}

/// Frames a connection may have queued before it counts as too slow
pub const OUTBOUND_CAPACITY: usize = 64;

/// Error returned when a frame cannot be queued for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The writer task has dropped its receiver
    #[error("connection {0} is closed")]
    Closed(ConnectionId),
    /// The peer is not reading and the queue is at capacity
    #[error("connection {0} outbound queue is full")]
    Full(ConnectionId),
}

/// Sender half of one live socket connection
///
/// Cloning a handle clones the channel sender; all clones address the same
/// connection and compare equal.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    tx: mpsc::Sender<Outbound>,
    evict: Arc<Notify>,
}

impl ConnectionHandle {
    /// Wrap an existing sender under a fresh connection id
    pub fn new(tx: mpsc::Sender<Outbound>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tx,
            evict: Arc::new(Notify::new()),
        }
    }

    /// Create a handle together with the receiver its writer task drains
    pub fn channel() -> (Self, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
        (Self::new(tx), rx)
    }

    /// Connection id
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    fn push(&self, outbound: Outbound) -> Result<(), SendError> {
        self.tx.try_send(outbound).map_err(|e| match e {
            TrySendError::Full(_) => SendError::Full(self.id),
            TrySendError::Closed(_) => SendError::Closed(self.id),
        })
    }

    /// Queue an event for this connection without waiting
    pub fn send(&self, event: ServerEvent) -> Result<(), SendError> {
        self.push(Outbound::Event(event))
    }

    /// Ask the writer task to close the socket
    ///
    /// A connection whose queue is full cannot take the close frame, so it is
    /// evicted instead.
    pub fn close(&self, code: u16, reason: impl Into<String>) -> Result<(), SendError> {
        let result = self.push(Outbound::Close {
            code,
            reason: reason.into(),
        });
        if let Err(SendError::Full(_)) = result {
            self.evict();
        }
        result
    }

    /// Tell the connection's reader loop to drop the socket
    pub fn evict(&self) {
        self.evict.notify_one();
    }

    /// Resolves once `evict` has been called on any clone of this handle
    pub async fn evicted(&self) {
        self.evict.notified().await
    }

    /// Whether the writer task has dropped its receiver
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

/// Live sessions keyed by user, ordered so presence lists are stable
pub type SessionMap = BTreeMap<UserId, ConnectionHandle>;

/// Registry of online users and their connections
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    sessions: Arc<RwLock<SessionMap>>,
    broadcaster: PresenceBroadcaster,
}

impl ConnectionRegistry {
    /// Create an empty registry with its own broadcaster
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcaster used for presence updates
    pub fn broadcaster(&self) -> &PresenceBroadcaster {
        &self.broadcaster
    }

    /// Store `handle` as the connection for `user_id`, then broadcast presence
    ///
    /// Returns the handle that was replaced, if the user was already online
    /// on a different connection.
    pub async fn register(
        &self,
        user_id: UserId,
        handle: ConnectionHandle,
    ) -> Option<ConnectionHandle> {
        let mut sessions = self.sessions.write().await;
        let connection_id = handle.id();
        let previous = sessions.insert(user_id.clone(), handle);
        let report = self.broadcaster.broadcast_presence(&sessions);

        tracing::info!(
            user_id = %user_id,
            connection_id = %connection_id,
            online = sessions.len(),
            delivered = report.delivered,
            "[Presence] User registered"
        );

        previous.filter(|old| old.id() != connection_id)
    }

    /// Remove the connection for `user_id`, if any, then broadcast presence
    ///
    /// Removing an absent user is not an error; the unchanged set is still
    /// broadcast.
    pub async fn unregister(&self, user_id: &UserId) -> Option<ConnectionHandle> {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(user_id);
        let report = self.broadcaster.broadcast_presence(&sessions);

        tracing::info!(
            user_id = %user_id,
            removed = removed.is_some(),
            online = sessions.len(),
            delivered = report.delivered,
            "[Presence] User unregistered"
        );

        removed
    }

    /// Remove the mapping for `user_id` only if it still points at
    /// `connection_id`, then broadcast presence
    ///
    /// Returns whether the mapping was removed.
    pub async fn unregister_connection(
        &self,
        user_id: &UserId,
        connection_id: ConnectionId,
    ) -> bool {
        let mut sessions = self.sessions.write().await;
        let owns_entry = sessions
            .get(user_id)
            .map(|handle| handle.id() == connection_id)
            .unwrap_or(false);
        if owns_entry {
            sessions.remove(user_id);
        }
        let report = self.broadcaster.broadcast_presence(&sessions);

        if owns_entry {
            tracing::info!(
                user_id = %user_id,
                connection_id = %connection_id,
                online = sessions.len(),
                delivered = report.delivered,
                "[Presence] Connection unregistered"
            );
        } else {
            tracing::debug!(
                user_id = %user_id,
                connection_id = %connection_id,
                "[Presence] Stale disconnect ignored, user has a newer connection"
            );
        }

        owns_entry
    }

    /// Current connection for `user_id`
    pub async fn lookup(&self, user_id: &UserId) -> Option<ConnectionHandle> {
        self.sessions.read().await.get(user_id).cloned()
    }

    /// Whether `user_id` currently has a connection
    pub async fn is_online(&self, user_id: &UserId) -> bool {
        self.sessions.read().await.contains_key(user_id)
    }

    /// Sorted list of online user ids
    pub async fn online_users(&self) -> Vec<UserId> {
        self.sessions.read().await.keys().cloned().collect()
    }

    /// Number of online users
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether nobody is online
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Push `event` to `user_id` if they are online
    ///
    /// Returns whether the event was queued for a live connection.
    pub async fn send_to_user(&self, user_id: &UserId, event: ServerEvent) -> bool {
        match self.lookup(user_id).await {
            Some(handle) => self.broadcaster.send_to(&handle, event),
            None => false,
        }
    }

    /// Close every connection and empty the registry
    pub async fn shutdown(&self) -> BroadcastReport {
        let mut sessions = self.sessions.write().await;
        let drained = std::mem::take(&mut *sessions);

        for (user_id, handle) in &drained {
            if handle.close(CLOSE_GOING_AWAY, "server shutting down").is_err() {
                tracing::debug!(user_id = %user_id, "[Presence] Connection already closed at shutdown");
            }
        }

        tracing::info!(closed = drained.len(), "[Presence] Registry drained");
        self.broadcaster.broadcast_presence(&sessions)
    }
}
