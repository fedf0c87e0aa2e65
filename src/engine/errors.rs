use thiserror::Error;

/// Errors raised by the hand engine. Grounded in `engine/nl/errors.rs`'s
/// `ActionError`/`StateError` split, collapsed into one `thiserror` enum
/// since this crate has no separate invariant-check pass to report through
/// a second type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("it is not your turn to act")]
    NotYourTurn,

    #[error("illegal action: {0}")]
    IllegalAction(&'static str),

    #[error("no hand is currently in progress")]
    HandNotInProgress,

    #[error("deck exhausted mid-hand")]
    DeckExhausted,

    #[error("evaluator received malformed input: {0}")]
    EvaluatorMalformed(&'static str),
}
