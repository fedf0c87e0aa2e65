//! Lobby-level validation, run before a `RoomCoordinator` mutates a `Room`.
//!
//! Grounded in the now-retired `ledger/lobby` validation functions' shape
//! (one small pure function per rule, composed by the caller) rather than a
//! single monolithic check, so each 400-vs-403 error kind in spec.md §7
//! traces back to exactly one function.

use crate::engine::Chips;
use crate::room::errors::RoomError;
use crate::room::types::Room;

pub fn validate_new_room(
    max_players: u32,
    small_blind: Chips,
    big_blind: Chips,
    buy_in: Chips,
) -> Result<(), RoomError> {
    if !(2..=9).contains(&max_players) {
        return Err(RoomError::InvalidInput(
            "maxPlayers must be between 2 and 9".into(),
        ));
    }
    if small_blind == 0 || big_blind <= small_blind {
        return Err(RoomError::InvalidInput(
            "bigBlind must be positive and exceed smallBlind".into(),
        ));
    }
    if buy_in < big_blind * 2 {
        return Err(RoomError::InvalidInput(
            "buyIn must cover at least two big blinds".into(),
        ));
    }
    Ok(())
}

pub fn validate_join(
    room: &Room,
    player_name: &str,
    password: Option<&str>,
) -> Result<(), RoomError> {
    if player_name.trim().is_empty() {
        return Err(RoomError::InvalidInput("playerName must not be empty".into()));
    }
    if room.game_started {
        return Err(RoomError::GameAlreadyStarted);
    }
    if let Some(expected) = &room.password {
        if password != Some(expected.as_str()) {
            return Err(RoomError::BadPassword);
        }
    }
    if room.has_player(player_name) {
        return Err(RoomError::NameTaken(player_name.to_string()));
    }
    if room.is_full() {
        return Err(RoomError::RoomFull);
    }
    Ok(())
}

pub fn validate_start(room: &Room, requester: &str) -> Result<(), RoomError> {
    if room.host_name != requester {
        return Err(RoomError::NotHost);
    }
    if room.game_started {
        return Err(RoomError::GameAlreadyStarted);
    }
    if room.players.len() < 2 {
        return Err(RoomError::NotEnoughPlayers);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_big_blind_not_exceeding_small_blind() {
        assert!(validate_new_room(6, 2, 2, 200).is_err());
        assert!(validate_new_room(6, 2, 4, 200).is_ok());
    }

    #[test]
    fn rejects_buy_in_below_two_big_blinds() {
        assert!(validate_new_room(6, 1, 2, 3).is_err());
        assert!(validate_new_room(6, 1, 2, 4).is_ok());
    }

    #[test]
    fn join_rejects_duplicate_name_and_wrong_password() {
        let mut room = Room::new(
            "table-1".into(),
            "host".into(),
            6,
            1,
            2,
            200,
            Some("secret".into()),
        );
        room.players.push("alice".into());
        assert_eq!(
            validate_join(&room, "host", Some("secret")),
            Err(RoomError::NameTaken("host".into()))
        );
        assert_eq!(
            validate_join(&room, "bob", Some("wrong")),
            Err(RoomError::BadPassword)
        );
        assert!(validate_join(&room, "bob", Some("secret")).is_ok());
    }

    #[test]
    fn start_requires_host_and_two_players() {
        let room = Room::new("table-1".into(), "host".into(), 6, 1, 2, 200, None);
        assert_eq!(validate_start(&room, "host"), Err(RoomError::NotEnoughPlayers));
        assert_eq!(validate_start(&room, "bob"), Err(RoomError::NotHost));
    }
}
