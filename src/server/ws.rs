//! The `/ws/room` bidirectional socket of spec.md §6: text frames carrying
//! `{type, roomId, ...}` JSON. Grounded in the axum `WebSocketUpgrade`
//! split-socket pattern (receive loop + a forwarding task draining an
//! `mpsc::UnboundedReceiver`) used by the other example repos' WS gateways,
//! since the teacher's own realtime layer is Supabase-hosted and has no
//! in-process socket handler to imitate.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::Extension;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::room::{ClientMessage, RoomInfo, ServerMessage};
use crate::server::routes::ServerContext;

const LOG_TARGET: &str = "server::ws";

pub async fn ws_upgrade(
    Extension(ctx): Extension<Arc<ServerContext>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, ctx))
}

async fn handle_socket(socket: WebSocket, ctx: Arc<ServerContext>) {
    let session_id = Uuid::new_v4();
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let forward = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let Ok(text) = serde_json::to_string(&message) else { continue };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let mut attached_room: Option<Uuid> = None;

    while let Some(Ok(frame)) = stream.next().await {
        let Message::Text(text) = frame else { continue };
        let parsed: Result<ClientMessage, _> = serde_json::from_str(&text);
        match parsed {
            Ok(ClientMessage::JoinRoom { room_id, player_name, password: _ }) => {
                match ctx.rooms.room_snapshot(room_id).await {
                    Ok(room_info) => {
                        ctx.rooms.attach_session(room_id, session_id, player_name, tx.clone()).ok();
                        attached_room = Some(room_id);
                        let _ = tx.send(joined_message(room_id, room_info));
                    }
                    Err(err) => {
                        let _ = tx.send(ServerMessage::PlayerNotification {
                            room_id,
                            message: err.to_string(),
                        });
                    }
                }
            }
            Ok(ClientMessage::LeaveRoom { room_id, player_name }) => {
                let _ = ctx.rooms.leave(room_id, player_name).await;
                ctx.rooms.detach_session(room_id, session_id);
                attached_room = None;
            }
            Err(err) => {
                tracing::warn!(target = LOG_TARGET, %err, "malformed websocket frame");
            }
        }
    }

    if let Some(room_id) = attached_room {
        ctx.rooms.detach_session(room_id, session_id);
    }
    forward.abort();
}

fn joined_message(room_id: Uuid, room: RoomInfo) -> ServerMessage {
    ServerMessage::JoinedRoom { room_id, room }
}
