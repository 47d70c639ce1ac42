/**
 * Presence Broadcasting
 *
 * Pushes the full online-user list to every registered connection whenever
 * the registry changes, and delivers targeted events to a single connection.
 *
 * # Delivery
 *
 * Delivery is best-effort: no acknowledgement, no retry. A client that misses
 * an update gets the next one on the next registry mutation. A failed send to
 * one connection is logged and skipped; it never aborts delivery to the rest.
 * A connection whose queue is full is evicted, since its peer has stopped
 * reading.
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::backend::realtime::registry::{ConnectionHandle, SendError, SessionMap};
use crate::shared::ServerEvent;

/// Outcome of one presence broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections the update was queued for
    pub delivered: usize,
    /// Connections whose writer task was gone or whose queue was full
    pub failed: usize,
}

/// Emits presence updates to all live connections
///
/// Cloning shares the broadcast counter.
#[derive(Debug, Clone, Default)]
pub struct PresenceBroadcaster {
    broadcasts: Arc<AtomicU64>,
}

impl PresenceBroadcaster {
    /// Create a broadcaster with a zeroed counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of presence broadcasts emitted so far
    pub fn broadcast_count(&self) -> u64 {
        self.broadcasts.load(Ordering::SeqCst)
    }

    /// Send the current key set of `sessions` to every connection in it
    pub fn broadcast_presence(&self, sessions: &SessionMap) -> BroadcastReport {
        self.broadcasts.fetch_add(1, Ordering::SeqCst);

        let online: Vec<_> = sessions.keys().cloned().collect();
        let event = ServerEvent::OnlineUsers(online);
        let mut report = BroadcastReport::default();

        for (user_id, handle) in sessions {
            match handle.send(event.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e @ SendError::Full(_)) => {
                    report.failed += 1;
                    tracing::warn!(user_id = %user_id, "[Presence] Evicting slow connection: {}", e);
                    handle.evict();
                }
                Err(e @ SendError::Closed(_)) => {
                    report.failed += 1;
                    tracing::warn!(user_id = %user_id, "[Presence] Broadcast send failed: {}", e);
                }
            }
        }

        tracing::debug!(
            online = sessions.len(),
            delivered = report.delivered,
            failed = report.failed,
            "[Presence] Broadcast online users"
        );

        report
    }

    /// Send a single event to one connection
    ///
    /// Returns whether the event was queued.
    pub fn send_to(&self, handle: &ConnectionHandle, event: ServerEvent) -> bool {
        let name = event.name();
        match handle.send(event) {
            Ok(()) => {
                tracing::debug!(connection_id = %handle.id(), event = name, "[Realtime] Event queued");
                true
            }
            Err(e) => {
                tracing::warn!(event = name, "[Realtime] Targeted send failed: {}", e);
                false
            }
        }
    }
}
