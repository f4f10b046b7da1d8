//! WebSocket handler for room-scoped realtime chat events.
//!
//! The `/ws` endpoint upgrades an HTTP connection to a WebSocket. Once
//! connected, the handler:
//!
//! - **Receives commands:** Parses incoming text frames as [`WsCommand`]:
//!   `join_chat` and `leave_chat` manage the connection's room set, `ping`
//!   answers with `{"event":"pong"}`. Unknown or malformed frames are logged
//!   and ignored.
//! - **Forwards events:** Subscribes to the [`EventBus`] on [`AppState`] and
//!   pushes each [`ChatEvent`] whose room the connection has joined as a
//!   JSON text frame. Events for rooms the client never joined are dropped.
//!
//! Lagged receivers (when the client is too slow to keep up) are handled
//! gracefully: the handler logs a warning and continues receiving.
//!
//! A connection that joins no rooms receives nothing; room membership dies
//! with the connection and is never persisted.

use std::collections::HashSet;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::state::AppState;

/// Incoming command from a WebSocket client.
#[derive(Debug, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    /// Start receiving events for this chat's room.
    JoinChat { chat_id: String },
    /// Stop receiving events for this chat's room.
    LeaveChat { chat_id: String },
    /// Keep-alive ping. Server responds with `{"type":"pong"}`.
    Ping,
}

/// Upgrade an HTTP request to a WebSocket connection for chat events.
///
/// This is mounted at `/ws` in the router.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

/// Core WebSocket connection handler.
///
/// Uses `tokio::select!` to multiplex between receiving events from the
/// [`EventBus`] and incoming WebSocket messages from the client, keeping
/// both directions in a single task.
async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let mut event_rx = state.event_bus.subscribe();
    let mut rooms: HashSet<Uuid> = HashSet::new();

    loop {
        tokio::select! {
            // --- Branch 1: Forward room-scoped events to the client ---
            event_result = event_rx.recv() => {
                match event_result {
                    Ok(event) => {
                        if !rooms.contains(&event.room()) {
                            continue;
                        }
                        match serde_json::to_string(&event) {
                            Ok(json) => {
                                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                                    // Client disconnected
                                    break;
                                }
                            }
                            Err(err) => {
                                tracing::warn!("Failed to serialize ChatEvent: {err}");
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(
                            skipped = n,
                            "WebSocket subscriber lagged, skipping {n} events"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        // EventBus sender was dropped (server shutting down)
                        break;
                    }
                }
            }

            // --- Branch 2: Process commands from the client ---
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        process_command(&text, &mut ws_sender, &mut rooms).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        // Client disconnected
                        break;
                    }
                    Some(Err(err)) => {
                        tracing::debug!("WebSocket receive error: {err}");
                        break;
                    }
                    // Ignore binary, ping, pong protocol frames (handled by axum/tungstenite)
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!("WebSocket connection closed");
}

/// Parse and process a single command from the WebSocket client.
async fn process_command(
    text: &str,
    ws_sender: &mut (impl SinkExt<Message, Error = axum::Error> + Unpin),
    rooms: &mut HashSet<Uuid>,
) {
    let cmd: WsCommand = match serde_json::from_str(text) {
        Ok(cmd) => cmd,
        Err(err) => {
            tracing::warn!(
                raw = %text,
                error = %err,
                "Ignoring malformed WebSocket command"
            );
            return;
        }
    };

    match cmd {
        WsCommand::JoinChat { chat_id } => match Uuid::parse_str(&chat_id) {
            Ok(id) => {
                rooms.insert(id);
                tracing::debug!(%chat_id, "Joined chat room");
            }
            Err(err) => {
                tracing::warn!(%chat_id, error = %err, "join_chat: invalid UUID");
            }
        },
        WsCommand::LeaveChat { chat_id } => match Uuid::parse_str(&chat_id) {
            Ok(id) => {
                rooms.remove(&id);
                tracing::debug!(%chat_id, "Left chat room");
            }
            Err(err) => {
                tracing::warn!(%chat_id, error = %err, "leave_chat: invalid UUID");
            }
        },
        WsCommand::Ping => {
            let pong = r#"{"type":"pong"}"#;
            if ws_sender.send(Message::Text(pong.into())).await.is_err() {
                tracing::debug!("Failed to send pong (client disconnecting)");
            }
        }
    }
}
