use thiserror::Error;

/// Errors raised by room/lobby operations, as distinct from in-hand
/// `EngineError`s. Grounded in the now-retired `ledger/lobby` validation
/// error shape, collapsed to the kinds spec.md §7 actually names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("room not found")]
    RoomNotFound,

    #[error("game not found")]
    GameNotFound,

    #[error("a player named '{0}' is already seated")]
    NameTaken(String),

    #[error("room is full")]
    RoomFull,

    #[error("incorrect room password")]
    BadPassword,

    #[error("only the host may do that")]
    NotHost,

    #[error("at least two players are required to start")]
    NotEnoughPlayers,

    #[error("the game has already started")]
    GameAlreadyStarted,

    #[error("the game has not started")]
    GameNotStarted,

    #[error("it is not your turn to act")]
    NotYourTurn,

    #[error("illegal action: {0}")]
    IllegalAction(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<crate::engine::EngineError> for RoomError {
    fn from(err: crate::engine::EngineError) -> Self {
        use crate::engine::EngineError;
        match err {
            EngineError::NotYourTurn => RoomError::NotYourTurn,
            EngineError::IllegalAction(reason) => RoomError::IllegalAction(reason.to_string()),
            EngineError::HandNotInProgress => RoomError::GameNotStarted,
            EngineError::DeckExhausted | EngineError::EvaluatorMalformed(_) => {
                RoomError::Internal(err.to_string())
            }
        }
    }
}
