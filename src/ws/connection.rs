//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection:
//! dispatching incoming commands to the [`RealtimeService`] and draining
//! the connection's outbound queue onto the socket.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::messages::{ClientCommand, Dispatch};
use crate::domain::{ConnectionId, EventName};
use crate::service::RealtimeService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// The connection is registered on entry and unregistered on exit, whether
/// the client closed the socket or a write failed.
pub async fn run_connection(socket: WebSocket, realtime: RealtimeService) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut conn = realtime.connect().await;
    let id = conn.id;

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_message(&realtime, id, text.as_str()).await;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        realtime
                            .broadcaster()
                            .emit_to_connection(
                                id,
                                EventName::Error,
                                serde_json::json!({
                                    "code": 400,
                                    "message": "binary frames are not supported",
                                }),
                            )
                            .await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(connection_id = %id, error = %e, "ws read failed");
                        break;
                    }
                    // Ping/Pong are answered by axum.
                    Some(Ok(_)) => {}
                }
            }
            outbound = conn.outbound.recv() => {
                let Some(message) = outbound else { break };
                let json = match serde_json::to_string(message.as_ref()) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(connection_id = %id, error = %e, "failed to encode outbound message");
                        continue;
                    }
                };
                if ws_tx.send(Message::text(json)).await.is_err() {
                    break;
                }
            }
        }
    }

    realtime.disconnect(id).await;
    tracing::debug!(connection_id = %id, "ws connection closed");
}

/// Parses one text frame and applies it.
///
/// Replies, including errors for rejected frames, are queued on the
/// connection's own outbound queue.
async fn handle_text_message(realtime: &RealtimeService, id: ConnectionId, text: &str) {
    let command = match ClientCommand::parse(text) {
        Ok(command) => command,
        Err(err) => {
            tracing::debug!(connection_id = %id, code = err.code, message = %err.message, "rejected ws frame");
            realtime
                .broadcaster()
                .emit_to_connection(id, EventName::Error, err.to_payload())
                .await;
            return;
        }
    };

    match Dispatch::from(command) {
        Dispatch::Join(topic) => {
            realtime.join(id, topic).await;
        }
        Dispatch::Leave(topic) => {
            realtime.leave(id, topic).await;
        }
        Dispatch::StationUpdates(station_id) => {
            realtime.request_station_updates(id, station_id).await;
        }
        Dispatch::TrainStatus(train_id) => {
            realtime.request_train_status(id, train_id).await;
        }
    }
}
