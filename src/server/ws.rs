//! WebSocket handler for real-time updates.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::server::state::AppState;
use crate::store::CALL_STORE;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handles an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Send current derived state on connection
    if let Some(snapshot) = current_snapshot() {
        let _ = sender.send(Message::Text(snapshot)).await;
    }

    // Subscribe to broadcast channel
    let mut rx = state.subscribe();

    // Forward broadcast messages to this client
    let send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    // Drain incoming messages until the client closes
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }
}

/// Serializes the store's derived values for a newly connected client.
fn current_snapshot() -> Option<String> {
    let store = CALL_STORE.read().ok()?;
    let message = serde_json::json!({
        "type": "snapshot",
        "data": {
            "filtered": store.filtered.len(),
            "buckets": store.buckets,
            "stats": store.summary,
            "last_refresh": store.last_refresh.map(|t| t.to_rfc3339()),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    serde_json::to_string(&message).ok()
}
