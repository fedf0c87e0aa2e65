//! The 52-card source shuffled once at the start of every hand.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::card::{Card, Suit};
use crate::engine::errors::EngineError;

/// A one-shot, ordered sequence of unique cards. Built fresh for each hand;
/// there is no in-place reshuffle once constructed.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds the 52-card set and applies a uniform Fisher-Yates shuffle via
    /// `rand::seq::SliceRandom`, grounded in the teacher's use of
    /// `rand::rngs::StdRng` for deterministic-when-seeded shuffling.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in 2..=14 {
                cards.push(Card::new(rank, suit).expect("rank in 2..=14 is always valid"));
            }
        }
        cards.shuffle(rng);
        Deck { cards }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Removes and returns `n` cards from the head of the deck.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, EngineError> {
        if self.cards.len() < n {
            return Err(EngineError::DeckExhausted);
        }
        Ok(self.cards.drain(0..n).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn builds_fifty_two_unique_cards() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = Deck::new(&mut rng);
        assert_eq!(deck.remaining(), 52);
        let unique: HashSet<(u8, Suit)> = deck.cards.iter().map(|c| (c.rank, c.suit)).collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn deal_removes_from_head_and_exhausts() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut deck = Deck::new(&mut rng);
        let hand = deck.deal(2).unwrap();
        assert_eq!(hand.len(), 2);
        assert_eq!(deck.remaining(), 50);

        let mut rng2 = StdRng::seed_from_u64(7);
        let mut empty = Deck { cards: Vec::new() };
        let _ = &mut rng2;
        assert!(matches!(empty.deal(1), Err(EngineError::DeckExhausted)));
    }
}
