//! Card and suit value types.
//!
//! Grounded in `showdown/mod.rs`'s `Suit`/`Card`/`decode_card` (rank `2..=14`,
//! suit as a small enum), dropping the index-based `1..=52` encoding that
//! existed only to feed the zero-knowledge gadgets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::errors::EngineError;

pub type Rank = u8;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn letter(self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// An immutable playing card. `rank` is validated to `2..=14` (Ace high) at
/// construction; there is no mutation primitive once built.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Result<Self, EngineError> {
        if !(2..=14).contains(&rank) {
            return Err(EngineError::EvaluatorMalformed("card rank out of range"));
        }
        Ok(Card { rank, suit })
    }

    pub fn rank_name(self) -> &'static str {
        match self.rank {
            2 => "2",
            3 => "3",
            4 => "4",
            5 => "5",
            6 => "6",
            7 => "7",
            8 => "8",
            9 => "9",
            10 => "10",
            11 => "Jack",
            12 => "Queen",
            13 => "King",
            14 => "Ace",
            _ => unreachable!("rank validated at construction"),
        }
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_name(), self.suit)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Sort by rank descending, then suit descending — the canonical ordering
/// the evaluator classifies against.
pub fn sort_desc(cards: &mut [Card]) {
    cards.sort_by(|a, b| match b.rank.cmp(&a.rank) {
        std::cmp::Ordering::Equal => b.suit.cmp(&a.suit),
        other => other,
    });
}

#[inline]
pub fn is_wheel_ranks(r: &[Rank; 5]) -> bool {
    *r == [5, 4, 3, 2, 14]
}

#[inline]
pub fn is_run_desc_ranks(r: &[Rank; 5]) -> bool {
    r[0] == r[1] + 1 && r[1] == r[2] + 1 && r[2] == r[3] + 1 && r[3] == r[4] + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_rank() {
        assert!(Card::new(1, Suit::Clubs).is_err());
        assert!(Card::new(15, Suit::Clubs).is_err());
        assert!(Card::new(2, Suit::Clubs).is_ok());
        assert!(Card::new(14, Suit::Spades).is_ok());
    }

    #[test]
    fn sort_desc_orders_rank_then_suit() {
        let mut cards = [
            Card::new(5, Suit::Clubs).unwrap(),
            Card::new(14, Suit::Hearts).unwrap(),
            Card::new(14, Suit::Spades).unwrap(),
        ];
        sort_desc(&mut cards);
        assert_eq!(cards[0].rank, 14);
        assert_eq!(cards[0].suit, Suit::Spades);
        assert_eq!(cards[2].rank, 5);
    }
}
