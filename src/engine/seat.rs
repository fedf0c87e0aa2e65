//! Per-seat mutable state and its single mutation primitive.
//!
//! Grounded in `engine/nl/types.rs`'s `PlayerState` (fields renamed to the
//! spec's vocabulary: `chips`, `current_bet`, `has_folded`, `is_all_in`,
//! `is_out`) and in `game/betting.rs`'s `BettingRound::process_action` for
//! the split between seat mutation and engine-side legality checking: the
//! seat itself never rejects an action, it only applies the chip-movement
//! effects the engine has already decided are legal.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::engine::actions::Action;
use crate::engine::types::Chips;
use crate::evaluator::HandRank;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Seat {
    pub name: String,
    pub chips: Chips,
    pub hole_cards: Vec<Card>,
    pub best_hand: Option<[Card; 5]>,
    pub hand_rank: Option<HandRank>,
    pub current_bet: Chips,
    pub has_folded: bool,
    pub is_all_in: bool,
    pub is_out: bool,
}

impl Seat {
    pub fn new(name: String, chips: Chips) -> Self {
        Seat {
            name,
            chips,
            hole_cards: Vec::new(),
            best_hand: None,
            hand_rank: None,
            current_bet: 0,
            has_folded: false,
            is_all_in: false,
            is_out: false,
        }
    }

    /// The single mutation primitive. `pot` is threaded through and returned
    /// rather than mutated via a shared reference, matching the spec's
    /// `applyAction(action, amount, pot) -> newPot` signature. Legality is
    /// not checked here — that is `HandEngine`'s job; a negative chip count
    /// is an unrecoverable engine bug, surfaced as a panic rather than
    /// silently saturating, so a caller that got the bookkeeping wrong fails
    /// loudly instead of drifting the chip count.
    pub fn apply_action(&mut self, action: Action, amount: Chips, pot: Chips) -> Chips {
        match action {
            Action::Fold => {
                self.has_folded = true;
                pot
            }
            Action::Check => pot,
            Action::Call | Action::Bet { .. } | Action::Raise { .. } => {
                self.chips = self
                    .chips
                    .checked_sub(amount)
                    .expect("seat chips went negative: engine bookkeeping bug");
                self.current_bet += amount;
                pot + amount
            }
            Action::AllIn => {
                let staked = self.chips;
                self.current_bet += staked;
                self.chips = 0;
                self.is_all_in = true;
                pot + staked
            }
        }
    }

    pub fn reset_for_round(&mut self) {
        self.current_bet = 0;
    }

    /// Clears everything scoped to a single hand, but not `is_out` — a
    /// busted seat stays busted across hands.
    pub fn reset_for_hand(&mut self) {
        self.hole_cards.clear();
        self.best_hand = None;
        self.hand_rank = None;
        self.current_bet = 0;
        self.has_folded = false;
        self.is_all_in = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    #[test]
    fn call_moves_chips_to_pot_and_current_bet() {
        let mut seat = Seat::new("a".into(), 100);
        let pot = seat.apply_action(Action::Call, 10, 0);
        assert_eq!(pot, 10);
        assert_eq!(seat.chips, 90);
        assert_eq!(seat.current_bet, 10);
    }

    #[test]
    fn all_in_zeroes_chips_and_sets_flag() {
        let mut seat = Seat::new("a".into(), 40);
        let pot = seat.apply_action(Action::AllIn, 0, 10);
        assert_eq!(pot, 50);
        assert_eq!(seat.chips, 0);
        assert!(seat.is_all_in);
        assert_eq!(seat.current_bet, 40);
    }

    #[test]
    fn fold_sets_flag_and_leaves_pot_unchanged() {
        let mut seat = Seat::new("a".into(), 40);
        let pot = seat.apply_action(Action::Fold, 0, 25);
        assert_eq!(pot, 25);
        assert!(seat.has_folded);
    }

    #[test]
    fn reset_for_hand_clears_everything_but_is_out() {
        let mut seat = Seat::new("a".into(), 0);
        seat.hole_cards.push(Card::new(2, Suit::Clubs).unwrap());
        seat.has_folded = true;
        seat.is_all_in = true;
        seat.is_out = true;
        seat.current_bet = 10;
        seat.reset_for_hand();
        assert!(seat.hole_cards.is_empty());
        assert!(!seat.has_folded);
        assert!(!seat.is_all_in);
        assert_eq!(seat.current_bet, 0);
        assert!(seat.is_out, "is_out must survive a hand reset");
    }
}
