use crate::engine::types::{Chips, Phase, SeatId};
use crate::evaluator::HandRank;

/// Emitted by every `HandEngine` state transition; consumed by the
/// `RoomCoordinator` to build outbound snapshots and to drive `tracing`
/// spans. Grounded in `engine/nl/events.rs`'s `GameEvent` enum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandEvent {
    HandStarted {
        dealer: SeatId,
    },
    ActionApplied {
        seat: SeatId,
        action_converted_to_all_in: bool,
    },
    StreetDealt {
        phase: Phase,
    },
    RoundEnded,
    AllPlayersAllIn,
    AutoAdvanceStep {
        phase: Phase,
    },
    ShowdownReached,
    HandEndedByFolds {
        winner: SeatId,
    },
    PotAwarded {
        winners: Vec<SeatId>,
        share: Chips,
        remainder: Chips,
    },
    HandResult {
        seat: SeatId,
        rank: HandRank,
    },
}
