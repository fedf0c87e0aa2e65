//! `HandState`: the data a single hand carries from deal to payout.
//!
//! Grounded in `engine/nl/state.rs`'s `BettingState`, trimmed to the fields
//! spec.md §3 names and with `acted` as an explicit set (the teacher tracks
//! it implicitly via `pending_to_match`; this crate's round-completion rule
//! needs the positive "has this seat acted" fact directly, per spec.md
//! §4.4.4's "and acted" clause).

use std::collections::HashSet;

use uuid::Uuid;

use crate::card::Card;
use crate::deck::Deck;
use crate::engine::types::{Chips, Phase, SeatId};

/// The per-hand data: built fresh by `HandEngine::start_new_hand`, discarded
/// after payout. Seats themselves (chips, `is_out`) live on `HandEngine`
/// across hands — only the fields that genuinely reset each hand live here.
pub struct HandState {
    pub game_id: Uuid,
    pub deck: Deck,
    pub community_cards: Vec<Card>,
    pub pot: Chips,
    pub phase: Phase,
    pub current_highest_bet: Chips,
    pub dealer_pos: SeatId,
    pub small_blind_pos: SeatId,
    pub big_blind_pos: SeatId,
    pub current_actor_pos: SeatId,
    pub acted_this_round: HashSet<SeatId>,
    pub is_auto_advancing: bool,
}
