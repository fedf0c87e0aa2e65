use serde::{Deserialize, Serialize};

use super::types::Chips;

/// Action + amount as a tagged variant, grounded in `engine/nl/actions.rs`'s
/// `PlayerBetAction` but dropping its `ark_serialize` round-trip machinery —
/// this crate never feeds an action through a circuit, only `serde`. Per the
/// design note this removes the source's pitfall where an amount is required
/// or forbidden per action but only validated ad-hoc: the shape itself
/// enforces which actions carry an amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet { amount: Chips },
    Raise { amount: Chips },
    AllIn,
}
