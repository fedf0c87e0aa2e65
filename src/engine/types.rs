use serde::{Deserialize, Serialize};

/// Chip counts. Grounded in `engine/nl/types.rs`'s `Chips = u64` alias.
pub type Chips = u64;

/// Index of a seat around the table, stable for the lifetime of a room.
pub type SeatId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Idle,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
    GameOver,
}

impl Phase {
    pub fn is_betting_street(self) -> bool {
        matches!(self, Phase::PreFlop | Phase::Flop | Phase::Turn | Phase::River)
    }

    pub fn community_card_count(self) -> usize {
        match self {
            Phase::Idle | Phase::PreFlop | Phase::GameOver => 0,
            Phase::Flop => 3,
            Phase::Turn => 4,
            Phase::River | Phase::Showdown => 5,
        }
    }
}
