//! Request/response bodies for the HTTP surface of spec.md §6.
//!
//! Grounded in the now-retired `server/dto.rs`'s plain `#[derive(Serialize)]`
//! response-struct convention (one struct per route, `rename_all =
//! "camelCase"`), generalised from the teacher's demo-game payloads to the
//! room/game vocabulary this crate actually serves.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{Action, Chips};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_name: String,
    pub player_name: String,
    pub max_players: u32,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub buy_in: Chips,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_id: Uuid,
    pub host_name: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinByNameRequest {
    pub room_name: String,
    pub player_name: String,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub player_name: String,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomResponse {
    pub room_id: Uuid,
    pub room_name: String,
    pub player_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    pub player_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameResponse {
    pub game_id: Uuid,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRoomRequest {
    pub player_name: String,
}

/// `{playerName, action, amount?}` — `action` is internally tagged by
/// `engine::Action`'s own `#[serde(tag = "action")]`, so flattening it here
/// reuses the domain enum's (de)serialization instead of re-declaring the
/// variant list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub player_name: String,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateQuery {
    pub player_name: String,
}
