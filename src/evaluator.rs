//! Seven-card hand evaluator.
//!
//! Grounded directly in `showdown/native.rs`'s `classify_five_and_canonicalize`,
//! `choose_best5_from7` and `tiebreak_vector`: same enumeration-of-21-subsets
//! algorithm, same classification order, same tie-break vectors. The
//! zero-knowledge score-packing machinery (`pack_score_field`, `Fr`-typed
//! scores, `assert_category_exact`) is dropped — there is no circuit layer in
//! this crate, so a plain `(HandRank, [u8; 5])` tuple comparison via derived
//! `Ord` replaces the base-16 `u32` packing trick.

use serde::{Deserialize, Serialize};

use crate::card::{is_run_desc_ranks, is_wheel_ranks, sort_desc, Card, Rank};
use crate::engine::errors::EngineError;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandRank {
    NoHand = 0,
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

/// Best five-card hand found among the candidate cards, plus its rank and
/// the tie-break vector used to compare it against other hands of the same
/// rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluatedHand {
    pub rank: HandRank,
    pub best_five: [Card; 5],
    tiebreak: [u8; 5],
}

impl EvaluatedHand {
    /// Total order across hands of any rank: higher rank wins; equal rank
    /// compares the tie-break vector lexicographically.
    pub fn beats(&self, other: &EvaluatedHand) -> bool {
        (self.rank, self.tiebreak) > (other.rank, other.tiebreak)
    }

    pub fn ties(&self, other: &EvaluatedHand) -> bool {
        self.rank == other.rank && self.tiebreak == other.tiebreak
    }
}

/// `evaluate(hole, community)` — `hole` has exactly 2 cards, `community` has
/// 3..=5. Enumerates all `C(7,5)` (or `C(6,5)`/`C(5,5)`) five-card subsets,
/// classifies each, and keeps the maximum. Pure and total over well-formed
/// input; fails only on malformed input (wrong counts or duplicate cards).
pub fn evaluate(hole: &[Card], community: &[Card]) -> Result<EvaluatedHand, EngineError> {
    if hole.len() != 2 {
        return Err(EngineError::EvaluatorMalformed("hole cards must be exactly 2"));
    }
    if !(3..=5).contains(&community.len()) {
        return Err(EngineError::EvaluatorMalformed(
            "community cards must be 3..=5",
        ));
    }
    let mut all: Vec<Card> = hole.iter().chain(community.iter()).copied().collect();
    let mut seen = std::collections::HashSet::new();
    for c in &all {
        if !seen.insert((c.rank, c.suit)) {
            return Err(EngineError::EvaluatorMalformed("duplicate card"));
        }
    }

    let mut best: Option<(HandCategory, [Card; 5], [u8; 5])> = None;
    let n = all.len();
    all.sort_by(|a, b| b.rank.cmp(&a.rank));
    for combo in combinations(n, 5) {
        let five = [
            all[combo[0]],
            all[combo[1]],
            all[combo[2]],
            all[combo[3]],
            all[combo[4]],
        ];
        let (cat, canon) = classify_five_and_canonicalize(five);
        let tb = tiebreak_vector(cat, &canon);
        let candidate = (cat, canon, tb);
        best = Some(match best {
            None => candidate,
            Some(current) if (candidate.0, candidate.2) > (current.0, current.2) => candidate,
            Some(current) => current,
        });
    }
    let (cat, best_five, tiebreak) = best.expect("at least one 5-card subset always exists");
    Ok(EvaluatedHand {
        rank: cat.to_hand_rank(best_five),
        best_five,
        tiebreak,
    })
}

fn combinations(n: usize, k: usize) -> Vec<[usize; 5]> {
    debug_assert_eq!(k, 5);
    let mut out = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    for e in (d + 1)..n {
                        out.push([a, b, c, d, e]);
                    }
                }
            }
        }
    }
    out
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl HandCategory {
    fn to_hand_rank(self, canon: [Card; 5]) -> HandRank {
        match self {
            HandCategory::HighCard => HandRank::HighCard,
            HandCategory::OnePair => HandRank::OnePair,
            HandCategory::TwoPair => HandRank::TwoPair,
            HandCategory::ThreeOfAKind => HandRank::ThreeOfAKind,
            HandCategory::Straight => HandRank::Straight,
            HandCategory::Flush => HandRank::Flush,
            HandCategory::FullHouse => HandRank::FullHouse,
            HandCategory::FourOfAKind => HandRank::FourOfAKind,
            HandCategory::StraightFlush => {
                if canon[0].rank == 14 && !is_wheel_ranks(&ranks(&canon)) {
                    HandRank::RoyalFlush
                } else {
                    HandRank::StraightFlush
                }
            }
        }
    }
}

fn ranks(h: &[Card; 5]) -> [Rank; 5] {
    [h[0].rank, h[1].rank, h[2].rank, h[3].rank, h[4].rank]
}

/// Category-specific tie-break vector from a canonical 5-card hand.
fn tiebreak_vector(cat: HandCategory, h: &[Card; 5]) -> [u8; 5] {
    let r = ranks(h);
    match cat {
        HandCategory::StraightFlush | HandCategory::Straight => {
            let high = if is_wheel_ranks(&r) { 5 } else { r[0] };
            [high, 0, 0, 0, 0]
        }
        HandCategory::FourOfAKind => [r[0], r[4], 0, 0, 0],
        HandCategory::FullHouse => [r[0], r[3], 0, 0, 0],
        HandCategory::Flush => [r[0], r[1], r[2], r[3], r[4]],
        HandCategory::ThreeOfAKind => [r[0], r[3], r[4], 0, 0],
        HandCategory::TwoPair => [r[0], r[2], r[4], 0, 0],
        HandCategory::OnePair => [r[0], r[2], r[3], r[4], 0],
        HandCategory::HighCard => [r[0], r[1], r[2], r[3], r[4]],
    }
}

/// Classify any 5 cards and return `(category, canonical 5)`.
fn classify_five_and_canonicalize(h5: [Card; 5]) -> (HandCategory, [Card; 5]) {
    let mut s = h5;
    sort_desc(&mut s);

    let mut cnt = [0u8; 15];
    for c in s.iter() {
        cnt[c.rank as usize] += 1;
    }

    let same_suit = s.iter().all(|c| c.suit == s[0].suit);

    let mut uniq: Vec<Rank> = s.iter().map(|c| c.rank).collect();
    uniq.dedup();

    let (has_straight, straight_ranks): (bool, [Rank; 5]) = if uniq.len() == 5 {
        let r = [uniq[0], uniq[1], uniq[2], uniq[3], uniq[4]];
        if is_run_desc_ranks(&r) {
            (true, r)
        } else {
            let mut set = r;
            set.sort_unstable();
            if set == [2, 3, 4, 5, 14] {
                (true, [5, 4, 3, 2, 14])
            } else {
                (false, [0; 5])
            }
        }
    } else {
        (false, [0; 5])
    };

    if has_straight && same_suit {
        let suit = s[0].suit;
        let k: [Card; 5] = std::array::from_fn(|i| {
            *s.iter()
                .find(|c| c.rank == straight_ranks[i] && c.suit == suit)
                .expect("straight rank present in same-suit hand")
        });
        return (HandCategory::StraightFlush, k);
    }

    if let Some((x_rank, _)) = (2..=14)
        .rev()
        .map(|r| (r, cnt[r as usize]))
        .find(|&(_r, c)| c == 4)
    {
        let quads: Vec<Card> = s.iter().filter(|c| c.rank == x_rank).cloned().collect();
        let kicker = s.iter().cloned().find(|c| c.rank != x_rank).expect("kicker exists");
        return (
            HandCategory::FourOfAKind,
            [quads[0], quads[1], quads[2], quads[3], kicker],
        );
    }

    let trips_ranks: Vec<Rank> = (2..=14).rev().filter(|&r| cnt[r as usize] >= 3).collect();
    if !trips_ranks.is_empty() {
        let t = trips_ranks[0];
        let pair_cands: Vec<Rank> = (2..=14)
            .rev()
            .filter(|&r| r != t && cnt[r as usize] >= 2)
            .collect();
        if !pair_cands.is_empty() {
            let p = pair_cands[0];
            let trips: Vec<Card> = s.iter().filter(|c| c.rank == t).take(3).cloned().collect();
            let pair: Vec<Card> = s.iter().filter(|c| c.rank == p).take(2).cloned().collect();
            return (
                HandCategory::FullHouse,
                [trips[0], trips[1], trips[2], pair[0], pair[1]],
            );
        }
    }

    if same_suit {
        return (HandCategory::Flush, s);
    }

    if has_straight {
        let k: [Card; 5] = std::array::from_fn(|i| {
            s.iter()
                .filter(|c| c.rank == straight_ranks[i])
                .max_by_key(|c| c.suit)
                .cloned()
                .expect("straight rank present")
        });
        return (HandCategory::Straight, k);
    }

    if let Some((t, _)) = (2..=14)
        .rev()
        .map(|r| (r, cnt[r as usize]))
        .find(|&(_r, c)| c >= 3)
    {
        let trips: Vec<Card> = s.iter().filter(|c| c.rank == t).take(3).cloned().collect();
        let mut kickers: Vec<Card> = s.iter().filter(|c| c.rank != t).cloned().collect();
        sort_desc(&mut kickers);
        return (
            HandCategory::ThreeOfAKind,
            [trips[0], trips[1], trips[2], kickers[0], kickers[1]],
        );
    }

    let pairs: Vec<Rank> = (2..=14).rev().filter(|&r| cnt[r as usize] >= 2).collect();
    if pairs.len() >= 2 {
        let higher_pair_rank = pairs[0];
        let lower_pair_rank = pairs[1];
        let higher_pair: Vec<Card> = s
            .iter()
            .filter(|c| c.rank == higher_pair_rank)
            .take(2)
            .cloned()
            .collect();
        let lower_pair: Vec<Card> = s
            .iter()
            .filter(|c| c.rank == lower_pair_rank)
            .take(2)
            .cloned()
            .collect();
        let kicker = s
            .iter()
            .cloned()
            .find(|c| c.rank != higher_pair_rank && c.rank != lower_pair_rank)
            .expect("kicker exists");
        return (
            HandCategory::TwoPair,
            [
                higher_pair[0],
                higher_pair[1],
                lower_pair[0],
                lower_pair[1],
                kicker,
            ],
        );
    }

    if let Some((p, _)) = (2..=14)
        .rev()
        .map(|r| (r, cnt[r as usize]))
        .find(|&(_r, c)| c >= 2)
    {
        let pair: Vec<Card> = s.iter().filter(|c| c.rank == p).take(2).cloned().collect();
        let mut kickers: Vec<Card> = s.iter().filter(|c| c.rank != p).cloned().collect();
        sort_desc(&mut kickers);
        return (
            HandCategory::OnePair,
            [pair[0], pair[1], kickers[0], kickers[1], kickers[2]],
        );
    }

    (HandCategory::HighCard, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit).unwrap()
    }

    #[test]
    fn straight_flush_beats_four_of_a_kind() {
        // Hole A-S K-S vs A-H A-D. Community Q-S J-S 10-S 2-C 2-H.
        let hole_a = [c(14, Suit::Spades), c(13, Suit::Spades)];
        let hole_b = [c(14, Suit::Hearts), c(14, Suit::Diamonds)];
        let community = [
            c(12, Suit::Spades),
            c(11, Suit::Spades),
            c(10, Suit::Spades),
            c(2, Suit::Clubs),
            c(2, Suit::Hearts),
        ];
        let eval_a = evaluate(&hole_a, &community).unwrap();
        let eval_b = evaluate(&hole_b, &community).unwrap();
        assert_eq!(eval_a.rank, HandRank::RoyalFlush);
        assert_eq!(eval_b.rank, HandRank::FourOfAKind);
        assert!(eval_a.beats(&eval_b));
    }

    #[test]
    fn wheel_loses_to_six_high_straight_and_beats_nothing() {
        let wheel = [c(14, Suit::Clubs), c(2, Suit::Diamonds)];
        let wheel_board = [
            c(3, Suit::Hearts),
            c(4, Suit::Spades),
            c(5, Suit::Clubs),
            c(9, Suit::Diamonds),
            c(10, Suit::Hearts),
        ];
        let six_high = [c(6, Suit::Clubs), c(2, Suit::Spades)];
        let six_high_board = [
            c(3, Suit::Hearts),
            c(4, Suit::Spades),
            c(5, Suit::Clubs),
            c(9, Suit::Diamonds),
            c(10, Suit::Hearts),
        ];
        let wheel_eval = evaluate(&wheel, &wheel_board).unwrap();
        let six_eval = evaluate(&six_high, &six_high_board).unwrap();
        assert_eq!(wheel_eval.rank, HandRank::Straight);
        assert_eq!(six_eval.rank, HandRank::Straight);
        assert!(six_eval.beats(&wheel_eval));
    }

    #[test]
    fn four_of_a_kind_resolved_by_kicker() {
        let a = [c(14, Suit::Clubs), c(13, Suit::Clubs)];
        let b = [c(14, Suit::Diamonds), c(2, Suit::Diamonds)];
        let board = [
            c(14, Suit::Hearts),
            c(14, Suit::Spades),
            c(9, Suit::Clubs),
            c(5, Suit::Hearts),
            c(3, Suit::Spades),
        ];
        let eval_a = evaluate(&a, &board).unwrap();
        let eval_b = evaluate(&b, &board).unwrap();
        assert_eq!(eval_a.rank, HandRank::FourOfAKind);
        assert!(eval_a.beats(&eval_b));
    }

    #[test]
    fn order_independent_over_permuted_input() {
        let hole = [c(9, Suit::Clubs), c(9, Suit::Diamonds)];
        let community = [
            c(9, Suit::Hearts),
            c(4, Suit::Spades),
            c(4, Suit::Clubs),
            c(2, Suit::Diamonds),
            c(7, Suit::Hearts),
        ];
        let mut reversed = community;
        reversed.reverse();
        let a = evaluate(&hole, &community).unwrap();
        let b = evaluate(&hole, &reversed).unwrap();
        assert_eq!(a.rank, b.rank);
        assert_eq!(a.best_five, b.best_five);
    }

    #[test]
    fn rejects_malformed_input() {
        let hole = [c(9, Suit::Clubs), c(9, Suit::Diamonds)];
        let too_few = [c(4, Suit::Spades), c(4, Suit::Clubs)];
        assert!(evaluate(&hole, &too_few).is_err());

        let duplicate = [
            c(9, Suit::Clubs),
            c(4, Suit::Spades),
            c(4, Suit::Clubs),
            c(2, Suit::Diamonds),
            c(7, Suit::Hearts),
        ];
        assert!(evaluate(&hole, &duplicate).is_err());
    }
}
