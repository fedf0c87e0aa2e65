//! `HandEngine`: the authoritative state machine driving one hand from deal
//! through showdown. Grounded in `engine/nl/engine.rs`'s `BettingEngineNL`
//! (turn rotation, legality-then-apply shape, `Transition`-style outcome
//! reporting via events) but reworked around spec.md §4.4's exact rules:
//! the simpler "acted this round" completion clause, the documented
//! equal-split-among-winners payout (no tiered side pots), and no
//! minimum-raise-delta enforcement.
//!
//! The engine is synchronous and pure: it never sleeps. Auto-advance pacing
//! and the post-showdown display delay are the room executor's job (see
//! `room::coordinator`), which calls `deal_next_street` / `run_showdown` /
//! `finish_hand` at the right times via cancellable `tokio::time::sleep`.

use std::collections::HashSet;

use rand::Rng;
use uuid::Uuid;

use crate::deck::Deck;
use crate::engine::actions::Action;
use crate::engine::errors::EngineError;
use crate::engine::events::HandEvent;
use crate::engine::seat::Seat;
use crate::engine::state::HandState;
use crate::engine::types::{Chips, Phase, SeatId};
use crate::evaluator;

pub struct HandEngine {
    seats: Vec<Seat>,
    dealer_pos: Option<SeatId>,
    small_blind: Chips,
    big_blind: Chips,
    pot_carry: Chips,
    hand: Option<HandState>,
    game_over: bool,
    /// Winner/share pairs from the most recently settled hand, cleared at
    /// the start of the next one. Read by `room::snapshot` to fill in
    /// `isWinner`/`chipsWon` on the showdown snapshot.
    last_payout: Vec<(SeatId, Chips)>,
}

impl HandEngine {
    pub fn new(seat_names: Vec<(String, Chips)>, small_blind: Chips, big_blind: Chips) -> Self {
        let seats = seat_names
            .into_iter()
            .map(|(name, chips)| Seat::new(name, chips))
            .collect();
        HandEngine {
            seats,
            dealer_pos: None,
            small_blind,
            big_blind,
            pot_carry: 0,
            hand: None,
            game_over: false,
            last_payout: Vec::new(),
        }
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn hand(&self) -> Option<&HandState> {
        self.hand.as_ref()
    }

    /// Winner/share pairs from the most recently settled hand. Empty before
    /// the first hand and while a hand is still in progress past its award.
    pub fn last_payout(&self) -> &[(SeatId, Chips)] {
        &self.last_payout
    }

    pub fn phase(&self) -> Phase {
        match &self.hand {
            Some(h) => h.phase,
            None if self.game_over => Phase::GameOver,
            None => Phase::Idle,
        }
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.hand.as_ref().map(|h| h.is_auto_advancing).unwrap_or(false)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn current_actor_name(&self) -> Option<&str> {
        let hand = self.hand.as_ref()?;
        Some(self.seats[hand.current_actor_pos].name.as_str())
    }

    fn active_seat_indices(&self) -> Vec<SeatId> {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_out)
            .map(|(i, _)| i)
            .collect()
    }

    fn contesting_seat_indices(&self) -> Vec<SeatId> {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_out && !s.has_folded)
            .map(|(i, _)| i)
            .collect()
    }

    fn seats_able_to_act(&self) -> Vec<SeatId> {
        self.contesting_seat_indices()
            .into_iter()
            .filter(|&i| !self.seats[i].is_all_in)
            .collect()
    }

    fn next_among(&self, from: SeatId, predicate: impl Fn(&Seat) -> bool) -> Option<SeatId> {
        let n = self.seats.len();
        for step in 1..=n {
            let candidate = (from + step) % n;
            if predicate(&self.seats[candidate]) {
                return Some(candidate);
            }
        }
        None
    }

    /// §4.4.1: start a new hand, or transition to `GameOver` if at most one
    /// seat remains in the game.
    pub fn start_new_hand(&mut self, rng: &mut impl Rng) -> Result<Vec<HandEvent>, EngineError> {
        let active = self.active_seat_indices();
        if active.len() <= 1 {
            self.game_over = true;
            self.hand = None;
            return Ok(vec![]);
        }

        for &i in &active {
            self.seats[i].reset_for_hand();
        }
        self.last_payout.clear();

        let dealer_pos = match self.dealer_pos {
            None => active[0],
            Some(prev) => self
                .next_among(prev, |s| !s.is_out)
                .unwrap_or(active[0]),
        };
        self.dealer_pos = Some(dealer_pos);

        let (small_blind_pos, big_blind_pos) = if active.len() == 2 {
            let other = self
                .next_among(dealer_pos, |s| !s.is_out)
                .expect("heads-up has exactly one other active seat");
            (dealer_pos, other)
        } else {
            let sb = self
                .next_among(dealer_pos, |s| !s.is_out)
                .expect("at least 2 active seats");
            let bb = self
                .next_among(sb, |s| !s.is_out)
                .expect("at least 2 active seats");
            (sb, bb)
        };

        let mut deck = Deck::new(rng);
        for &i in &active {
            let cards = deck.deal(2)?;
            self.seats[i].hole_cards = cards;
        }

        let sb_amount = self.small_blind.min(self.seats[small_blind_pos].chips);
        self.seats[small_blind_pos].apply_action(Action::Call, sb_amount, 0);
        if self.seats[small_blind_pos].chips == 0 {
            self.seats[small_blind_pos].is_all_in = true;
        }
        let bb_amount = self.big_blind.min(self.seats[big_blind_pos].chips);
        self.seats[big_blind_pos].apply_action(Action::Call, bb_amount, 0);
        if self.seats[big_blind_pos].chips == 0 {
            self.seats[big_blind_pos].is_all_in = true;
        }
        let pot = self.pot_carry + sb_amount + bb_amount;
        self.pot_carry = 0;

        let current_actor_pos = self
            .next_to_act_after(big_blind_pos)
            .unwrap_or(dealer_pos);

        let mut acted = HashSet::new();
        if self.seats[small_blind_pos].is_all_in {
            acted.insert(small_blind_pos);
        }
        if self.seats[big_blind_pos].is_all_in {
            acted.insert(big_blind_pos);
        }

        self.hand = Some(HandState {
            game_id: Uuid::new_v4(),
            deck,
            community_cards: Vec::new(),
            pot,
            phase: Phase::PreFlop,
            current_highest_bet: self.big_blind,
            dealer_pos,
            small_blind_pos,
            big_blind_pos,
            current_actor_pos,
            acted_this_round: acted,
            is_auto_advancing: false,
        });

        Ok(vec![HandEvent::HandStarted { dealer: dealer_pos }])
    }

    fn next_to_act_after(&self, from: SeatId) -> Option<SeatId> {
        self.next_among(from, |s| !s.is_out && !s.has_folded && !s.is_all_in)
    }

    /// §4.4.3: apply one inbound action from the named seat.
    pub fn apply_action(
        &mut self,
        actor_name: &str,
        action: Action,
    ) -> Result<Vec<HandEvent>, EngineError> {
        let hand = self.hand.as_ref().ok_or(EngineError::HandNotInProgress)?;
        if !hand.phase.is_betting_street() {
            return Err(EngineError::IllegalAction("no betting round is open"));
        }
        if hand.is_auto_advancing {
            return Err(EngineError::IllegalAction(
                "hand is auto-advancing; no action accepted",
            ));
        }
        let actor = hand.current_actor_pos;
        if self.seats[actor].name != actor_name {
            return Err(EngineError::NotYourTurn);
        }

        let current_highest_bet = hand.current_highest_bet;
        let seat_current_bet = self.seats[actor].current_bet;
        let seat_chips = self.seats[actor].chips;

        let (applied_action, amount, converted_to_all_in) = match action {
            Action::Fold => (Action::Fold, 0, false),
            Action::Check => {
                if seat_current_bet != current_highest_bet {
                    return Err(EngineError::IllegalAction(
                        "cannot check while facing a bet",
                    ));
                }
                (Action::Check, 0, false)
            }
            Action::Call => {
                if current_highest_bet <= seat_current_bet {
                    return Err(EngineError::IllegalAction("nothing to call"));
                }
                let owed = current_highest_bet - seat_current_bet;
                let paid = owed.min(seat_chips);
                (Action::Call, paid, paid == seat_chips && paid < owed)
            }
            Action::Bet { amount } => {
                if current_highest_bet != 0 {
                    return Err(EngineError::IllegalAction(
                        "cannot bet while a bet is already open",
                    ));
                }
                if amount == 0 || amount > seat_chips {
                    return Err(EngineError::IllegalAction("bet amount out of range"));
                }
                (Action::Bet { amount }, amount, amount == seat_chips)
            }
            Action::Raise { amount } => {
                if amount <= current_highest_bet {
                    return Err(EngineError::IllegalAction(
                        "raise must exceed the current highest bet",
                    ));
                }
                if amount > seat_current_bet + seat_chips {
                    return Err(EngineError::IllegalAction(
                        "raise exceeds available chips",
                    ));
                }
                let owed = amount - seat_current_bet;
                (Action::Raise { amount }, owed, owed == seat_chips)
            }
            Action::AllIn => {
                if seat_chips == 0 {
                    return Err(EngineError::IllegalAction("no chips left to push in"));
                }
                (Action::AllIn, seat_chips, true)
            }
        };

        let hand = self.hand.as_mut().expect("checked above");
        hand.pot = self.seats[actor].apply_action(applied_action, amount, hand.pot);
        hand.acted_this_round.insert(actor);
        if self.seats[actor].chips == 0 {
            self.seats[actor].is_all_in = true;
        }

        let new_current_bet = self.seats[actor].current_bet;
        if new_current_bet > hand.current_highest_bet {
            hand.current_highest_bet = new_current_bet;
        }

        let mut events = vec![HandEvent::ActionApplied {
            seat: actor,
            action_converted_to_all_in: converted_to_all_in,
        }];

        if let Some(next) = self.next_to_act_after(actor) {
            self.hand.as_mut().unwrap().current_actor_pos = next;
        }

        events.extend(self.check_round_completion()?);
        Ok(events)
    }

    /// §4.4.4: decide whether the betting round is complete, and if so,
    /// drive the hand to the next street, auto-advance mode, or showdown.
    fn check_round_completion(&mut self) -> Result<Vec<HandEvent>, EngineError> {
        let mut events = Vec::new();
        let contesting = self.contesting_seat_indices();

        if contesting.len() <= 1 {
            events.extend(self.award_by_fold(contesting)?);
            return Ok(events);
        }

        let hand = self.hand.as_ref().expect("hand in progress");
        let current_highest_bet = hand.current_highest_bet;
        let round_done = contesting.iter().all(|&i| {
            let seat = &self.seats[i];
            seat.is_all_in
                || (seat.current_bet == current_highest_bet
                    && hand.acted_this_round.contains(&i))
        });
        if !round_done {
            return Ok(events);
        }

        events.push(HandEvent::RoundEnded);
        for &i in &contesting {
            self.seats[i].reset_for_round();
        }
        {
            let hand = self.hand.as_mut().expect("hand in progress");
            hand.current_highest_bet = 0;
            hand.acted_this_round.clear();
        }

        events.extend(self.advance_street_or_settle()?);
        Ok(events)
    }

    fn advance_street_or_settle(&mut self) -> Result<Vec<HandEvent>, EngineError> {
        let mut events = Vec::new();
        let next_phase = match self.hand.as_ref().expect("hand in progress").phase {
            Phase::PreFlop => Phase::Flop,
            Phase::Flop => Phase::Turn,
            Phase::Turn => Phase::River,
            Phase::River => Phase::Showdown,
            other => other,
        };

        if next_phase == Phase::Showdown {
            events.extend(self.run_showdown()?);
            return Ok(events);
        }

        events.extend(self.deal_street(next_phase)?);

        let contesting = self.contesting_seat_indices();
        if contesting.len() <= 1 {
            events.extend(self.award_by_fold(contesting)?);
            return Ok(events);
        }

        if self.seats_able_to_act().len() <= 1 {
            let hand = self.hand.as_mut().expect("hand in progress");
            hand.is_auto_advancing = true;
            events.push(HandEvent::AllPlayersAllIn);
        } else {
            let dealer = self.hand.as_ref().unwrap().dealer_pos;
            let first = self.next_to_act_after(dealer).unwrap_or(dealer);
            self.hand.as_mut().unwrap().current_actor_pos = first;
        }
        Ok(events)
    }

    fn deal_street(&mut self, phase: Phase) -> Result<Vec<HandEvent>, EngineError> {
        let n_new = phase.community_card_count() - self.hand.as_ref().unwrap().community_cards.len();
        let hand = self.hand.as_mut().expect("hand in progress");
        let dealt = hand.deck.deal(n_new)?;
        hand.community_cards.extend(dealt);
        hand.phase = phase;
        Ok(vec![HandEvent::StreetDealt { phase }])
    }

    /// Called by the room executor once per auto-advance pacing tick. Deals
    /// the next street, or runs showdown once the river is out.
    pub fn auto_advance_step(&mut self) -> Result<Vec<HandEvent>, EngineError> {
        let hand = self.hand.as_ref().ok_or(EngineError::HandNotInProgress)?;
        if !hand.is_auto_advancing {
            return Err(EngineError::IllegalAction("hand is not auto-advancing"));
        }
        let mut events = vec![HandEvent::AutoAdvanceStep { phase: hand.phase }];
        events.extend(self.advance_street_or_settle()?);
        Ok(events)
    }

    fn award_by_fold(&mut self, contesting: Vec<SeatId>) -> Result<Vec<HandEvent>, EngineError> {
        let winner = *contesting
            .first()
            .expect("award_by_fold only called with at least one contesting seat");
        let hand = self.hand.as_mut().expect("hand in progress");
        hand.phase = Phase::Showdown;
        let pot = hand.pot;
        hand.pot = 0;
        self.seats[winner].chips += pot;
        self.last_payout = vec![(winner, pot)];
        Ok(vec![
            HandEvent::HandEndedByFolds { winner },
            HandEvent::PotAwarded {
                winners: vec![winner],
                share: pot,
                remainder: 0,
            },
        ])
    }

    /// §4.4.5: evaluate every contesting hand, split the pot equally among
    /// the winner set, carry the remainder to next hand's pot.
    fn run_showdown(&mut self) -> Result<Vec<HandEvent>, EngineError> {
        let contesting = self.contesting_seat_indices();
        let hand = self.hand.as_mut().expect("hand in progress");
        hand.phase = Phase::Showdown;
        let community = hand.community_cards.clone();
        let pot = hand.pot;

        let mut events = Vec::new();
        let mut evaluated = Vec::with_capacity(contesting.len());
        for &i in &contesting {
            let result = evaluator::evaluate(&self.seats[i].hole_cards, &community)?;
            self.seats[i].best_hand = Some(result.best_five);
            self.seats[i].hand_rank = Some(result.rank);
            events.push(HandEvent::HandResult {
                seat: i,
                rank: result.rank,
            });
            evaluated.push((i, result));
        }

        let mut winners = vec![evaluated[0].0];
        let mut best = evaluated[0].1;
        for &(seat, result) in evaluated.iter().skip(1) {
            if result.beats(&best) {
                best = result;
                winners = vec![seat];
            } else if result.ties(&best) {
                winners.push(seat);
            }
        }

        let share = pot / winners.len() as Chips;
        let remainder = pot % winners.len() as Chips;
        for &w in &winners {
            self.seats[w].chips += share;
        }
        self.pot_carry = remainder;
        self.hand.as_mut().unwrap().pot = 0;
        self.last_payout = winners.iter().map(|&w| (w, share)).collect();

        events.push(HandEvent::PotAwarded {
            winners,
            share,
            remainder,
        });
        events.push(HandEvent::ShowdownReached);
        Ok(events)
    }

    /// §4.4.1 tail: mark zero-chip seats out, rotate the button, and clear
    /// the finished hand. The room executor calls this after the
    /// post-showdown display delay, then calls `start_new_hand` again.
    pub fn finish_hand(&mut self) {
        for seat in &mut self.seats {
            if !seat.is_out && seat.chips == 0 {
                seat.is_out = true;
            }
        }
        self.hand = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Suit};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn three_handed() -> HandEngine {
        HandEngine::new(
            vec![
                ("A".into(), 300),
                ("B".into(), 300),
                ("C".into(), 300),
            ],
            1,
            2,
        )
    }

    #[test]
    fn preflop_big_blind_gets_option() {
        let mut engine = three_handed();
        let mut rng = StdRng::seed_from_u64(1);
        engine.start_new_hand(&mut rng).unwrap();
        // dealer = seat 0 (A), sb = B(1), bb = C(2); first to act = A (seat 0)
        assert_eq!(engine.current_actor_name(), Some("A"));

        engine.apply_action("A", Action::Call).unwrap();
        assert_eq!(engine.current_actor_name(), Some("B"));
        engine.apply_action("B", Action::Call).unwrap();
        assert_eq!(engine.current_actor_name(), Some("C"));
        // C (big blind) checks; round must end here, not loop back.
        engine.apply_action("C", Action::Check).unwrap();
        assert_eq!(engine.phase(), Phase::Flop);
    }

    #[test]
    fn illegal_bet_of_zero_is_rejected() {
        let mut engine = three_handed();
        let mut rng = StdRng::seed_from_u64(2);
        engine.start_new_hand(&mut rng).unwrap();
        let err = engine.apply_action("A", Action::Bet { amount: 0 });
        assert!(err.is_err());
    }

    #[test]
    fn illegal_check_while_facing_a_bet_is_rejected() {
        let mut engine = three_handed();
        let mut rng = StdRng::seed_from_u64(5);
        engine.start_new_hand(&mut rng).unwrap();
        // Preflop already has the big blind's bet open, so A raises to 10
        // rather than opening fresh; B (the small blind, current bet 1)
        // still faces that bet and hasn't matched it.
        engine.apply_action("A", Action::Raise { amount: 10 }).unwrap();
        // Checking here must be rejected, and the engine state (current
        // actor, pot) must be unchanged by the rejected attempt.
        let actor_before = engine.current_actor_name().map(str::to_owned);
        let pot_before = engine.hand().unwrap().pot;
        let err = engine.apply_action("B", Action::Check);
        assert_eq!(err, Err(EngineError::IllegalAction("cannot check while facing a bet")));
        assert_eq!(engine.current_actor_name().map(str::to_owned), actor_before);
        assert_eq!(engine.hand().unwrap().pot, pot_before);
    }

    #[test]
    fn tied_showdown_splits_pot_equally_with_remainder_carried() {
        let mut engine = HandEngine::new(vec![("A".into(), 100), ("B".into(), 100)], 1, 2);
        let mut rng = StdRng::seed_from_u64(99);

        engine.seats[0].hole_cards =
            vec![Card::new(2, Suit::Clubs).unwrap(), Card::new(3, Suit::Clubs).unwrap()];
        engine.seats[1].hole_cards =
            vec![Card::new(2, Suit::Hearts).unwrap(), Card::new(3, Suit::Hearts).unwrap()];

        // Four aces plus a king on the board: the board plays for both
        // seats regardless of their low, irrelevant hole cards, so this is
        // a guaranteed tie.
        let community = vec![
            Card::new(14, Suit::Spades).unwrap(),
            Card::new(14, Suit::Hearts).unwrap(),
            Card::new(14, Suit::Diamonds).unwrap(),
            Card::new(14, Suit::Clubs).unwrap(),
            Card::new(13, Suit::Spades).unwrap(),
        ];

        engine.hand = Some(HandState {
            game_id: Uuid::new_v4(),
            deck: Deck::new(&mut rng),
            community_cards: community,
            pot: 101,
            phase: Phase::River,
            current_highest_bet: 0,
            dealer_pos: 0,
            small_blind_pos: 0,
            big_blind_pos: 1,
            current_actor_pos: 0,
            acted_this_round: HashSet::new(),
            is_auto_advancing: true,
        });

        let events = engine.run_showdown().unwrap();
        assert!(events.iter().any(|e| matches!(e, HandEvent::ShowdownReached)));

        let payouts = engine.last_payout().to_vec();
        assert_eq!(payouts.len(), 2, "both seats must tie and split the pot");
        for &(_, share) in &payouts {
            assert_eq!(share, 50);
        }
        assert_eq!(engine.pot_carry, 1, "the odd chip carries to the next hand's pot");
    }

    #[test]
    fn heads_up_all_in_triggers_auto_advance() {
        let mut engine = HandEngine::new(vec![("A".into(), 50), ("B".into(), 50)], 1, 2);
        let mut rng = StdRng::seed_from_u64(3);
        engine.start_new_hand(&mut rng).unwrap();
        // heads-up: dealer(A)=SB acts first preflop.
        assert_eq!(engine.current_actor_name(), Some("A"));
        engine.apply_action("A", Action::AllIn).unwrap();
        engine.apply_action("B", Action::Call).unwrap();
        assert!(engine.is_auto_advancing());
    }

    #[test]
    fn not_your_turn_is_rejected() {
        let mut engine = three_handed();
        let mut rng = StdRng::seed_from_u64(4);
        engine.start_new_hand(&mut rng).unwrap();
        let err = engine.apply_action("B", Action::Fold);
        assert_eq!(err, Err(EngineError::NotYourTurn));
    }
}
