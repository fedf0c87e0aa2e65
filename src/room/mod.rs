pub mod broadcaster;
pub mod coordinator;
pub mod errors;
pub mod messages;
pub mod snapshot;
pub mod types;
pub mod validation;

pub use coordinator::{RoomRegistry, RoomTiming};
pub use errors::RoomError;
pub use messages::{ClientMessage, RoomInfo, ServerMessage};
pub use snapshot::GameSnapshot;
pub use types::Room;
