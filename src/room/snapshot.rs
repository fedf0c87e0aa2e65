//! Pure snapshot construction: `HandEngine` state → the wire-shaped payload
//! of spec.md §6, viewer-scoped so other players' hole cards stay hidden
//! pre-showdown. Grounded in `server/dto.rs`'s response-struct shape (plain
//! serde structs with `rename_all = "camelCase"`), not in any teacher
//! snapshot logic — the teacher's demo stream exposes ZK-proof fields this
//! crate has no use for.

use serde::Serialize;
use uuid::Uuid;

use crate::card::Card;
use crate::engine::{Chips, HandEngine, Phase, SeatId};
use crate::evaluator::HandRank;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeatStatus {
    Active,
    Folded,
    AllIn,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: SeatId,
    pub name: String,
    pub chips: Chips,
    pub current_bet: Chips,
    pub status: SeatStatus,
    pub is_current_player: bool,
    pub is_all_in: bool,
    pub has_folded: bool,
    pub cards: Vec<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_rank: Option<HandRank>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_winner: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chips_won: Option<Chips>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: Option<Uuid>,
    pub pot: Chips,
    pub phase: Phase,
    pub current_bet: Chips,
    pub community_cards: Vec<Card>,
    pub current_player_name: Option<String>,
    pub players: Vec<PlayerView>,
    pub is_auto_advancing: bool,
}

/// Builds the viewer-scoped snapshot for `engine`. `viewer_name` decides
/// whose hole cards are visible pre-showdown; at showdown every non-folded
/// seat's best hand is revealed to everyone.
pub fn snapshot(engine: &HandEngine, viewer_name: &str) -> GameSnapshot {
    let phase = engine.phase();
    let hand = engine.hand();
    let at_showdown = phase == Phase::Showdown;
    let current_actor_name = engine.current_actor_name();
    let payouts = engine.last_payout();

    let players = engine
        .seats()
        .iter()
        .enumerate()
        .map(|(id, seat)| {
            let status = if seat.has_folded {
                SeatStatus::Folded
            } else if seat.is_all_in {
                SeatStatus::AllIn
            } else {
                SeatStatus::Active
            };

            // A fold-win also sets `phase = Showdown` (the lone survivor
            // takes the pot uncontested) but never populates `hand_rank` —
            // only `run_showdown` does that. Gate on it so a fold-win never
            // reveals the survivor's hole cards to other viewers.
            let reveal = (at_showdown && seat.hand_rank.is_some()) || seat.name == viewer_name;
            let cards = if reveal { seat.hole_cards.clone() } else { Vec::new() };

            let payout = payouts.iter().find(|(s, _)| *s == id).copied();

            PlayerView {
                id,
                name: seat.name.clone(),
                chips: seat.chips,
                current_bet: seat.current_bet,
                status,
                is_current_player: current_actor_name == Some(seat.name.as_str()),
                is_all_in: seat.is_all_in,
                has_folded: seat.has_folded,
                cards,
                hand_rank: if at_showdown { seat.hand_rank } else { None },
                is_winner: if at_showdown { Some(payout.is_some()) } else { None },
                chips_won: payout.map(|(_, share)| share),
            }
        })
        .collect();

    GameSnapshot {
        game_id: hand.map(|h| h.game_id),
        pot: hand.map(|h| h.pot).unwrap_or(0),
        phase,
        current_bet: hand.map(|h| h.current_highest_bet).unwrap_or(0),
        community_cards: hand.map(|h| h.community_cards.clone()).unwrap_or_default(),
        current_player_name: current_actor_name.map(str::to_owned),
        players,
        is_auto_advancing: engine.is_auto_advancing(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Action;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn hides_other_players_hole_cards_before_showdown() {
        let mut engine = HandEngine::new(
            vec![("A".into(), 100), ("B".into(), 100)],
            1,
            2,
        );
        let mut rng = StdRng::seed_from_u64(7);
        engine.start_new_hand(&mut rng).unwrap();

        let view = snapshot(&engine, "A");
        let a = view.players.iter().find(|p| p.name == "A").unwrap();
        let b = view.players.iter().find(|p| p.name == "B").unwrap();
        assert_eq!(a.cards.len(), 2);
        assert!(b.cards.is_empty());
    }

    #[test]
    fn reveals_all_non_folded_hands_at_showdown() {
        let mut engine = HandEngine::new(vec![("A".into(), 50), ("B".into(), 50)], 1, 2);
        let mut rng = StdRng::seed_from_u64(8);
        engine.start_new_hand(&mut rng).unwrap();
        engine.apply_action("A", Action::AllIn).unwrap();
        engine.apply_action("B", Action::Call).unwrap();
        while engine.is_auto_advancing() {
            engine.auto_advance_step().unwrap();
        }
        let view = snapshot(&engine, "A");
        assert_eq!(view.phase, Phase::Showdown);
        for p in &view.players {
            assert_eq!(p.cards.len(), 2);
            assert!(p.hand_rank.is_some());
            assert!(p.is_winner.is_some());
        }
    }
}
