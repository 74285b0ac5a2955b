use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket, rejection::WebSocketUpgradeRejection},
    },
    http::{HeaderMap, StatusCode, header::UPGRADE},
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;

use super::registry::{Connection, ConnectionState};
use crate::AppState;

const UPGRADE_SENTINEL: &str = "websocket";
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// WebSocket endpoint handler
/// Anything that isn't a websocket upgrade gets a plain-text 400
pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let upgrade = headers.get(UPGRADE).and_then(|v| v.to_str().ok());
    if !is_websocket_upgrade(upgrade) {
        tracing::debug!(upgrade = ?upgrade, "rejecting non-websocket request");
        return (StatusCode::BAD_REQUEST, "Expected websocket").into_response();
    }

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "WebSocket handshake rejected");
            return rejection.into_response();
        }
    };

    let buffer = state.settings.ws.outbound_buffer;
    ws.on_upgrade(move |socket| handle_socket(socket, state, buffer))
}

fn is_websocket_upgrade(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case(UPGRADE_SENTINEL))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, buffer: usize) {
    let (connection, peer) = Connection::pair(buffer);
    let id = connection.id();
    state.registry.register(connection).await;

    tracing::info!(connection = %id, "WebSocket connection established");

    let (mut inbox, liveness) = peer.into_parts();
    let mut state_rx = liveness.subscribe();
    let liveness = Arc::new(liveness);
    let (mut sender, mut receiver) = socket.split();

    // Send task: drain this connection's queue into the socket. Once the
    // connection leaves Open it finishes the close handshake and exits.
    let mut send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                payload = inbox.recv() => {
                    let Some(payload) = payload else { break };
                    if let Err(e) = sender.send(Message::Text(payload.to_string().into())).await {
                        tracing::debug!(connection = %id, error = %e, "WebSocket send failed");
                        return;
                    }
                }
                _ = async { let _ = state_rx.wait_for(|s| *s != ConnectionState::Open).await; } => break,
            }
        }
        // Flushes the queued Close reply (or sends our own Close)
        if let Err(e) = sender.close().await {
            tracing::debug!(connection = %id, error = %e, "WebSocket close failed");
        }
    });

    // Recv task: handle client messages (ping/pong handled automatically by axum)
    let recv_liveness = liveness.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection = %id, "WebSocket client sent close");
                    recv_liveness.closing();
                    return;
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Handled automatically by axum
                }
                Ok(Message::Text(_)) | Ok(Message::Binary(_)) => {
                    // Clients only listen
                }
                Err(e) => {
                    tracing::debug!(connection = %id, error = %e, "WebSocket receive error");
                    break;
                }
            }
        }
        recv_liveness.closing();
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => {
            // Give the send task a moment to complete the close handshake
            if tokio::time::timeout(CLOSE_GRACE, &mut send_task).await.is_err() {
                send_task.abort();
            }
        }
    }

    liveness.close();
    tracing::info!(connection = %id, "WebSocket connection closed");
}
