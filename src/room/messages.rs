//! Wire-shaped WebSocket payloads: the server→client message catalogue of
//! spec.md §6, plus the lobby-facing `RoomInfo` DTO returned by the HTTP
//! room-metadata routes. Grounded in `server/dto.rs`'s plain-struct,
//! `rename_all = "camelCase"` response shape.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{Action, Chips};
use crate::room::snapshot::GameSnapshot;
use crate::room::types::Room;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub room_id: Uuid,
    pub room_name: String,
    pub host_name: String,
    pub players: Vec<String>,
    pub max_players: u32,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub buy_in: Chips,
    pub has_password: bool,
    pub game_started: bool,
    pub game_id: Option<Uuid>,
}

impl From<&Room> for RoomInfo {
    fn from(room: &Room) -> Self {
        RoomInfo {
            room_id: room.id,
            room_name: room.room_name.clone(),
            host_name: room.host_name.clone(),
            players: room.players.clone(),
            max_players: room.max_players,
            small_blind: room.small_blind,
            big_blind: room.big_blind,
            buy_in: room.buy_in,
            has_password: room.password.is_some(),
            game_started: room.game_started,
            game_id: room.game_id,
        }
    }
}

/// Inbound WebSocket client intents, `{type, roomId, playerName}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    JoinRoom {
        room_id: Uuid,
        player_name: String,
        #[serde(default)]
        password: Option<String>,
    },
    LeaveRoom {
        room_id: Uuid,
        player_name: String,
    },
}

/// Outbound WebSocket server messages, `{type, roomId, data?}`.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    JoinedRoom {
        room_id: Uuid,
        room: RoomInfo,
    },
    RoomUpdate {
        room_id: Uuid,
        room: RoomInfo,
    },
    PlayerJoined {
        room_id: Uuid,
        player_name: String,
    },
    PlayerLeft {
        room_id: Uuid,
        player_name: String,
    },
    RoomClosed {
        room_id: Uuid,
    },
    GameStarted {
        room_id: Uuid,
        game_id: Uuid,
    },
    GameStateUpdate {
        room_id: Uuid,
        snapshot: GameSnapshot,
    },
    ShowdownResults {
        room_id: Uuid,
        snapshot: GameSnapshot,
    },
    PlayerNotification {
        room_id: Uuid,
        message: String,
    },
    AutoAdvanceNotification {
        room_id: Uuid,
        phase: crate::engine::Phase,
    },
}

/// Re-exported so callers needn't import `engine::Action` separately when
/// they only need the WS/HTTP action-intent shape.
pub type ActionIntent = Action;
