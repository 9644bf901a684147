use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::registry::ClientRegistry;

/// HTTP handler that upgrades `/ws/{client_token}` to a WebSocket.
///
/// After the upgrade the connection is registered under the client token
/// and managed by two tasks (sender + receiver).
pub async fn ws_handler(
    Path(client_token): Path<String>,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, client_token, state.registry))
}

/// Manage a single client connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers under the client token, superseding an older connection.
///   2. Spawns a sender task that forwards messages from the registry
///      channel -- the only place sends on this socket happen.
///   3. Idles on the inbound stream purely to detect disconnect.
///   4. Unregisters on teardown, guarded by the connection id so a
///      superseded connection cannot evict its successor.
async fn handle_socket(socket: WebSocket, token: String, registry: Arc<ClientRegistry>) {
    let (handle, mut rx) = registry.register(token.clone()).await;
    let conn_id = handle.conn_id;
    tracing::info!(token = %token, conn_id = %conn_id, "WebSocket connected");

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_token = token.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(token = %sender_token, "WebSocket sink closed");
                break;
            }
        }
    });

    // Inbound messages are not part of the protocol; this loop exists only
    // to notice the connection closing.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(token = %token, "Pong received");
            }
            Ok(_msg) => {}
            Err(e) => {
                tracing::debug!(token = %token, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    registry.unregister(&token, conn_id).await;
    send_task.abort();
    tracing::info!(token = %token, conn_id = %conn_id, "WebSocket disconnected");
}
