//! Room lobby metadata. Grounded in `ledger/lobby/types.rs`'s
//! `GameLobbyConfig`/`PlayerRecord` shape, stripped of the SeaORM typestate
//! and curve-generic shuffler assignment machinery — this crate persists
//! nothing, so a room is just an in-memory struct.

use uuid::Uuid;

use crate::engine::Chips;

#[derive(Clone, Debug)]
pub struct Room {
    pub id: Uuid,
    pub room_name: String,
    pub host_name: String,
    pub players: Vec<String>,
    pub max_players: u32,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub buy_in: Chips,
    pub password: Option<String>,
    pub game_started: bool,
    pub game_id: Option<Uuid>,
}

impl Room {
    pub fn new(
        room_name: String,
        host_name: String,
        max_players: u32,
        small_blind: Chips,
        big_blind: Chips,
        buy_in: Chips,
        password: Option<String>,
    ) -> Self {
        Room {
            id: Uuid::new_v4(),
            room_name,
            host_name: host_name.clone(),
            players: vec![host_name],
            max_players,
            small_blind,
            big_blind,
            buy_in,
            password,
            game_started: false,
            game_id: None,
        }
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() as u32 >= self.max_players
    }
}
