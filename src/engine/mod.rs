pub mod actions;
pub mod errors;
pub mod events;
pub mod hand_engine;
pub mod seat;
pub mod state;
pub mod types;

pub use actions::Action;
pub use errors::EngineError;
pub use events::HandEvent;
pub use hand_engine::HandEngine;
pub use seat::Seat;
pub use state::HandState;
pub use types::{Chips, Phase, SeatId};
