use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use tokio::sync::mpsc::error::SendError;
use tokio::sync::{mpsc, RwLock};
use tuberelay_core::types::{ClientToken, Timestamp};
use uuid::Uuid;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Cloneable handle to a single live connection.
///
/// Returned by [`ClientRegistry::lookup`]; may go stale the moment it is
/// returned (the peer can disconnect at any time), so sends through it must
/// be treated as fallible.
#[derive(Clone)]
pub struct ClientHandle {
    /// Unique per connection, not per token. Guards unregister so a
    /// superseded connection's teardown cannot evict its successor.
    pub conn_id: Uuid,
    /// Client-supplied token this connection is registered under.
    pub token: ClientToken,
    /// When this connection was established.
    pub connected_at: Timestamp,
    sender: WsSender,
}

impl ClientHandle {
    /// Queue a message for delivery on the connection's home context.
    ///
    /// Non-blocking; the connection's dedicated sender task performs the
    /// actual network send, which keeps per-connection sends serialized and
    /// per-producer order intact. Fails when the connection has gone away.
    pub fn send(&self, message: Message) -> Result<(), SendError<Message>> {
        self.sender.send(message)
    }
}

/// Maps client tokens to live WebSocket connections.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. The lock is held only for the duration of
/// the map operation itself, never across a network send.
pub struct ClientRegistry {
    connections: RwLock<HashMap<ClientToken, ClientHandle>>,
}

impl ClientRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a connection under `token`, superseding any previous entry
    /// for the same token. The superseded socket is not closed; its sends
    /// simply stop reaching the registry entry.
    ///
    /// Returns the handle plus the receiver half of the message channel so
    /// the caller can forward messages to the WebSocket sink.
    pub async fn register(
        &self,
        token: ClientToken,
    ) -> (ClientHandle, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ClientHandle {
            conn_id: Uuid::new_v4(),
            token: token.clone(),
            connected_at: chrono::Utc::now(),
            sender: tx,
        };
        self.connections.write().await.insert(token, handle.clone());
        (handle, rx)
    }

    /// Remove the entry for `token`, but only if it still belongs to
    /// `conn_id`.
    ///
    /// Idempotent; a no-op when the token is absent or has been superseded
    /// by a newer connection.
    pub async fn unregister(&self, token: &str, conn_id: Uuid) {
        let mut conns = self.connections.write().await;
        if conns.get(token).is_some_and(|c| c.conn_id == conn_id) {
            conns.remove(token);
        }
    }

    /// Look up the live connection for `token`.
    pub async fn lookup(&self, token: &str) -> Option<ClientHandle> {
        self.connections.read().await.get(token).cloned()
    }

    /// Return the current number of registered connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Ping frame to every connected client.
    ///
    /// Used by the heartbeat task to keep connections alive and detect
    /// stale ones.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.send(Message::Ping(Bytes::new()));
        }
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
