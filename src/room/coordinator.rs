//! `RoomCoordinator`: one logical executor per room, per spec.md §4.5/§5.
//!
//! Grounded in `server/demo/session_store.rs`'s actor-per-resource shape
//! (an owning task draining an mpsc queue, a registry of handles guarding
//! concurrent access) generalised from that file's single demo stream to
//! many independently-scheduled rooms. Each `RoomActor` owns its `Room`
//! metadata and `HandEngine` outright and processes commands strictly in
//! arrival order, which is what gives the engine lock-free single-owner
//! state: two intents for the same room can never race.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::engine::{Action, Chips, HandEngine, HandEvent};
use crate::room::broadcaster::Broadcaster;
use crate::room::errors::RoomError;
use crate::room::messages::{RoomInfo, ServerMessage};
use crate::room::snapshot::{self, GameSnapshot};
use crate::room::types::Room;
use crate::room::validation;
use crate::tokio_tools::spawn_named_task;

#[derive(Clone, Copy, Debug)]
pub struct RoomTiming {
    pub auto_advance_step: Duration,
    pub showdown_delay: Duration,
}

impl Default for RoomTiming {
    fn default() -> Self {
        RoomTiming {
            auto_advance_step: Duration::from_secs(3),
            showdown_delay: Duration::from_secs(2),
        }
    }
}

enum RoomCommand {
    Join {
        player_name: String,
        password: Option<String>,
        reply: oneshot::Sender<Result<RoomInfo, RoomError>>,
    },
    Leave {
        player_name: String,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    StartGame {
        requester: String,
        reply: oneshot::Sender<Result<Uuid, RoomError>>,
    },
    PlayerAction {
        player_name: String,
        action: Action,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    RoomSnapshot {
        reply: oneshot::Sender<RoomInfo>,
    },
    GameSnapshot {
        viewer_name: String,
        reply: oneshot::Sender<Result<GameSnapshot, RoomError>>,
    },
    Attach {
        session_id: Uuid,
        player_name: String,
        sender: mpsc::UnboundedSender<ServerMessage>,
    },
    Detach {
        session_id: Uuid,
    },
    AutoAdvanceTick {
        for_game: Uuid,
    },
    ShowdownTimeout {
        for_game: Uuid,
    },
}

#[derive(Clone)]
struct RoomHandle {
    tx: mpsc::UnboundedSender<RoomCommand>,
}

struct RegistryInner {
    rooms: DashMap<Uuid, RoomHandle>,
    names: DashMap<String, Uuid>,
    games: DashMap<Uuid, Uuid>,
    timing: RoomTiming,
}

impl RegistryInner {
    fn close_room(&self, room_id: Uuid, room_name: &str, current_game_id: Option<Uuid>) {
        self.rooms.remove(&room_id);
        self.names.remove(room_name);
        if let Some(game_id) = current_game_id {
            self.games.remove(&game_id);
        }
    }

    fn set_current_game(&self, room_id: Uuid, old: Option<Uuid>, new: Uuid) {
        if let Some(old_id) = old {
            self.games.remove(&old_id);
        }
        self.games.insert(new, room_id);
    }
}

/// Shared `roomId → (Room, HandEngine)` and `gameId → roomId` maps, per
/// spec.md §4.5. Cheaply cloneable; every clone shares the same rooms.
#[derive(Clone)]
pub struct RoomRegistry {
    inner: Arc<RegistryInner>,
}

impl RoomRegistry {
    pub fn new(timing: RoomTiming) -> Self {
        RoomRegistry {
            inner: Arc::new(RegistryInner {
                rooms: DashMap::new(),
                names: DashMap::new(),
                games: DashMap::new(),
                timing,
            }),
        }
    }

    pub fn create_room(
        &self,
        room_name: String,
        host_name: String,
        max_players: u32,
        small_blind: Chips,
        big_blind: Chips,
        buy_in: Chips,
        password: Option<String>,
    ) -> Result<RoomInfo, RoomError> {
        validation::validate_new_room(max_players, small_blind, big_blind, buy_in)?;
        if host_name.trim().is_empty() {
            return Err(RoomError::InvalidInput("playerName must not be empty".into()));
        }

        let room = Room::new(
            room_name.clone(),
            host_name,
            max_players,
            small_blind,
            big_blind,
            buy_in,
            password,
        );
        let room_id = room.id;

        match self.inner.names.entry(room_name) {
            Entry::Occupied(e) => return Err(RoomError::NameTaken(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(room_id);
            }
        }

        let info = RoomInfo::from(&room);
        let (tx, rx) = mpsc::unbounded_channel();
        let actor = RoomActor {
            room,
            engine: None,
            broadcaster: Broadcaster::new(),
            timing: self.inner.timing,
            rng: StdRng::from_entropy(),
            self_tx: tx.clone(),
            rx,
        };
        let registry = self.inner.clone();
        spawn_named_task(format!("room-{room_id}"), actor.run(registry));

        self.inner.rooms.insert(room_id, RoomHandle { tx });
        Ok(info)
    }

    pub fn room_id_by_name(&self, room_name: &str) -> Option<Uuid> {
        self.inner.names.get(room_name).map(|v| *v)
    }

    pub fn room_id_by_game(&self, game_id: Uuid) -> Option<Uuid> {
        self.inner.games.get(&game_id).map(|v| *v)
    }

    fn handle_of(&self, room_id: Uuid) -> Result<RoomHandle, RoomError> {
        self.inner
            .rooms
            .get(&room_id)
            .map(|h| h.clone())
            .ok_or(RoomError::RoomNotFound)
    }

    pub async fn join(
        &self,
        room_id: Uuid,
        player_name: String,
        password: Option<String>,
    ) -> Result<RoomInfo, RoomError> {
        let handle = self.handle_of(room_id)?;
        let (reply, rx) = oneshot::channel();
        handle
            .tx
            .send(RoomCommand::Join { player_name, password, reply })
            .map_err(|_| RoomError::RoomNotFound)?;
        rx.await.map_err(|_| RoomError::RoomNotFound)?
    }

    pub async fn leave(&self, room_id: Uuid, player_name: String) -> Result<(), RoomError> {
        let handle = self.handle_of(room_id)?;
        let (reply, rx) = oneshot::channel();
        handle
            .tx
            .send(RoomCommand::Leave { player_name, reply })
            .map_err(|_| RoomError::RoomNotFound)?;
        rx.await.map_err(|_| RoomError::RoomNotFound)?
    }

    pub async fn start_game(&self, room_id: Uuid, requester: String) -> Result<Uuid, RoomError> {
        let handle = self.handle_of(room_id)?;
        let (reply, rx) = oneshot::channel();
        handle
            .tx
            .send(RoomCommand::StartGame { requester, reply })
            .map_err(|_| RoomError::RoomNotFound)?;
        rx.await.map_err(|_| RoomError::RoomNotFound)?
    }

    pub async fn player_action(
        &self,
        game_id: Uuid,
        player_name: String,
        action: Action,
    ) -> Result<(), RoomError> {
        let room_id = self.room_id_by_game(game_id).ok_or(RoomError::GameNotFound)?;
        let handle = self.handle_of(room_id)?;
        let (reply, rx) = oneshot::channel();
        handle
            .tx
            .send(RoomCommand::PlayerAction { player_name, action, reply })
            .map_err(|_| RoomError::RoomNotFound)?;
        rx.await.map_err(|_| RoomError::RoomNotFound)?
    }

    pub async fn room_snapshot(&self, room_id: Uuid) -> Result<RoomInfo, RoomError> {
        let handle = self.handle_of(room_id)?;
        let (reply, rx) = oneshot::channel();
        handle
            .tx
            .send(RoomCommand::RoomSnapshot { reply })
            .map_err(|_| RoomError::RoomNotFound)?;
        rx.await.map_err(|_| RoomError::RoomNotFound)
    }

    pub async fn game_snapshot(
        &self,
        game_id: Uuid,
        viewer_name: String,
    ) -> Result<GameSnapshot, RoomError> {
        let room_id = self.room_id_by_game(game_id).ok_or(RoomError::GameNotFound)?;
        let handle = self.handle_of(room_id)?;
        let (reply, rx) = oneshot::channel();
        handle
            .tx
            .send(RoomCommand::GameSnapshot { viewer_name, reply })
            .map_err(|_| RoomError::RoomNotFound)?;
        rx.await.map_err(|_| RoomError::RoomNotFound)?
    }

    pub fn attach_session(
        &self,
        room_id: Uuid,
        session_id: Uuid,
        player_name: String,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<(), RoomError> {
        let handle = self.handle_of(room_id)?;
        handle
            .tx
            .send(RoomCommand::Attach { session_id, player_name, sender })
            .map_err(|_| RoomError::RoomNotFound)
    }

    pub fn detach_session(&self, room_id: Uuid, session_id: Uuid) {
        if let Ok(handle) = self.handle_of(room_id) {
            let _ = handle.tx.send(RoomCommand::Detach { session_id });
        }
    }
}

struct RoomActor {
    room: Room,
    engine: Option<HandEngine>,
    broadcaster: Broadcaster,
    timing: RoomTiming,
    rng: StdRng,
    self_tx: mpsc::UnboundedSender<RoomCommand>,
    rx: mpsc::UnboundedReceiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self, registry: Arc<RegistryInner>) {
        while let Some(cmd) = self.rx.recv().await {
            if !self.handle(cmd, &registry) {
                break;
            }
        }
    }

    fn current_game_id(&self) -> Option<Uuid> {
        self.engine.as_ref().and_then(|e| e.hand()).map(|h| h.game_id)
    }

    /// Returns `false` when the room has closed and the actor should stop.
    fn handle(&mut self, cmd: RoomCommand, registry: &Arc<RegistryInner>) -> bool {
        match cmd {
            RoomCommand::Join { player_name, password, reply } => {
                let result = validation::validate_join(&self.room, &player_name, password.as_deref());
                match result {
                    Ok(()) => {
                        self.room.players.push(player_name.clone());
                        self.broadcaster.broadcast_all(|| ServerMessage::PlayerJoined {
                            room_id: self.room.id,
                            player_name: player_name.clone(),
                        });
                        let info = RoomInfo::from(&self.room);
                        self.broadcaster.broadcast_all(|| ServerMessage::RoomUpdate {
                            room_id: self.room.id,
                            room: info.clone(),
                        });
                        let _ = reply.send(Ok(info));
                    }
                    Err(err) => {
                        let _ = reply.send(Err(err));
                    }
                }
                true
            }

            RoomCommand::Leave { player_name, reply } => {
                let is_host = self.room.host_name == player_name;
                self.room.players.retain(|p| p != &player_name);
                let _ = reply.send(Ok(()));

                if is_host {
                    self.broadcaster
                        .broadcast_all(|| ServerMessage::RoomClosed { room_id: self.room.id });
                    registry.close_room(self.room.id, &self.room.room_name, self.current_game_id());
                    return false;
                }
                if self.room.players.is_empty() {
                    registry.close_room(self.room.id, &self.room.room_name, self.current_game_id());
                    return false;
                }
                self.broadcaster.broadcast_all(|| ServerMessage::PlayerLeft {
                    room_id: self.room.id,
                    player_name: player_name.clone(),
                });
                let info = RoomInfo::from(&self.room);
                self.broadcaster.broadcast_all(|| ServerMessage::RoomUpdate {
                    room_id: self.room.id,
                    room: info.clone(),
                });
                true
            }

            RoomCommand::StartGame { requester, reply } => {
                if let Err(err) = validation::validate_start(&self.room, &requester) {
                    let _ = reply.send(Err(err));
                    return true;
                }

                let seat_names: Vec<(String, Chips)> = self
                    .room
                    .players
                    .iter()
                    .map(|name| (name.clone(), self.room.buy_in))
                    .collect();
                let mut engine = HandEngine::new(seat_names, self.room.small_blind, self.room.big_blind);
                if let Err(err) = engine.start_new_hand(&mut self.rng) {
                    let _ = reply.send(Err(RoomError::Internal(err.to_string())));
                    return true;
                }
                let game_id = engine
                    .hand()
                    .map(|h| h.game_id)
                    .expect("start_new_hand with >=2 fresh seats always opens a hand");
                self.engine = Some(engine);
                self.room.game_started = true;
                registry.set_current_game(self.room.id, self.room.game_id, game_id);
                self.room.game_id = Some(game_id);

                let _ = reply.send(Ok(game_id));
                self.broadcaster
                    .broadcast_all(|| ServerMessage::GameStarted { room_id: self.room.id, game_id });
                self.broadcast_game_state();
                self.maybe_schedule_auto_advance(game_id);
                true
            }

            RoomCommand::PlayerAction { player_name, action, reply } => {
                let Some(engine) = self.engine.as_mut() else {
                    let _ = reply.send(Err(RoomError::GameNotStarted));
                    return true;
                };
                match engine.apply_action(&player_name, action) {
                    Ok(events) => {
                        let _ = reply.send(Ok(()));
                        self.handle_events(&events);
                    }
                    Err(err) => {
                        let _ = reply.send(Err(err.into()));
                    }
                }
                true
            }

            RoomCommand::RoomSnapshot { reply } => {
                let _ = reply.send(RoomInfo::from(&self.room));
                true
            }

            RoomCommand::GameSnapshot { viewer_name, reply } => {
                let result = match &self.engine {
                    Some(engine) => Ok(snapshot::snapshot(engine, &viewer_name)),
                    None => Err(RoomError::GameNotStarted),
                };
                let _ = reply.send(result);
                true
            }

            RoomCommand::Attach { session_id, player_name, sender } => {
                self.broadcaster.attach(session_id, player_name, sender);
                true
            }

            RoomCommand::Detach { session_id } => {
                self.broadcaster.detach(session_id);
                true
            }

            RoomCommand::AutoAdvanceTick { for_game } => {
                if self.current_game_id() != Some(for_game) {
                    return true; // hand already moved on; timer fired late.
                }
                let Some(engine) = self.engine.as_mut() else { return true };
                if !engine.is_auto_advancing() {
                    return true;
                }
                match engine.auto_advance_step() {
                    Ok(events) => self.handle_events(&events),
                    Err(_) => return true,
                }
                if self.engine.as_ref().map(|e| e.is_auto_advancing()).unwrap_or(false) {
                    self.maybe_schedule_auto_advance(for_game);
                }
                true
            }

            RoomCommand::ShowdownTimeout { for_game } => {
                if self.current_game_id() != Some(for_game) {
                    return true;
                }
                let Some(engine) = self.engine.as_mut() else { return true };
                engine.finish_hand();
                if let Err(err) = engine.start_new_hand(&mut self.rng) {
                    tracing::warn!(room = %self.room.id, error = %err, "failed to start next hand");
                    return true;
                }
                if engine.is_game_over() {
                    self.broadcast_game_state();
                    return true;
                }
                let game_id = engine
                    .hand()
                    .map(|h| h.game_id)
                    .expect("start_new_hand succeeded above");
                registry.set_current_game(self.room.id, self.room.game_id, game_id);
                self.room.game_id = Some(game_id);
                self.broadcast_game_state();
                self.maybe_schedule_auto_advance(game_id);
                true
            }
        }
    }

    fn handle_events(&mut self, events: &[HandEvent]) {
        let showdown = events.iter().any(|e| matches!(e, HandEvent::ShowdownReached));
        let folded_out = events
            .iter()
            .any(|e| matches!(e, HandEvent::HandEndedByFolds { .. }));

        if showdown || folded_out {
            self.broadcast_showdown_results();
            if let Some(game_id) = self.current_game_id() {
                self.schedule_showdown_timeout(game_id);
            }
            return;
        }

        for event in events {
            if let HandEvent::AutoAdvanceStep { phase } = event {
                self.broadcaster.broadcast_all(|| ServerMessage::AutoAdvanceNotification {
                    room_id: self.room.id,
                    phase: *phase,
                });
            }
        }

        self.broadcast_game_state();

        if let Some(game_id) = self.current_game_id() {
            if self.engine.as_ref().map(|e| e.is_auto_advancing()).unwrap_or(false) {
                self.maybe_schedule_auto_advance(game_id);
            }
        }
    }

    fn broadcast_game_state(&mut self) {
        let Some(engine) = self.engine.as_ref() else { return };
        let room_id = self.room.id;
        self.broadcaster
            .broadcast_snapshot(engine, room_id, |room_id, snap| ServerMessage::GameStateUpdate {
                room_id,
                snapshot: snap,
            });
    }

    fn broadcast_showdown_results(&mut self) {
        let Some(engine) = self.engine.as_ref() else { return };
        let room_id = self.room.id;
        self.broadcaster
            .broadcast_snapshot(engine, room_id, |room_id, snap| ServerMessage::ShowdownResults {
                room_id,
                snapshot: snap,
            });
    }

    fn maybe_schedule_auto_advance(&self, game_id: Uuid) {
        let Some(engine) = self.engine.as_ref() else { return };
        if !engine.is_auto_advancing() {
            return;
        }
        let tx = self.self_tx.clone();
        let room_id = self.room.id;
        let delay = self.timing.auto_advance_step;
        spawn_named_task(format!("room-{room_id}-auto-advance"), async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(RoomCommand::AutoAdvanceTick { for_game: game_id });
        });
    }

    fn schedule_showdown_timeout(&self, game_id: Uuid) {
        let tx = self.self_tx.clone();
        let room_id = self.room.id;
        let delay = self.timing.showdown_delay;
        spawn_named_task(format!("room-{room_id}-showdown-delay"), async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(RoomCommand::ShowdownTimeout { for_game: game_id });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Phase;

    #[tokio::test]
    async fn host_leaving_closes_the_room() {
        let registry = RoomRegistry::new(RoomTiming::default());
        let info = registry
            .create_room("table-1".into(), "host".into(), 6, 1, 2, 200, None)
            .unwrap();
        registry.join(info.room_id, "alice".into(), None).await.unwrap();
        registry.join(info.room_id, "bob".into(), None).await.unwrap();

        registry.leave(info.room_id, "host".into()).await.unwrap();

        let err = registry.room_snapshot(info.room_id).await.unwrap_err();
        assert_eq!(err, RoomError::RoomNotFound);
        assert!(registry.room_id_by_name("table-1").is_none());
    }

    #[tokio::test]
    async fn non_host_leaving_keeps_the_room_open() {
        let registry = RoomRegistry::new(RoomTiming::default());
        let info = registry
            .create_room("table-2".into(), "host".into(), 6, 1, 2, 200, None)
            .unwrap();
        registry.join(info.room_id, "alice".into(), None).await.unwrap();

        registry.leave(info.room_id, "alice".into()).await.unwrap();

        let room = registry.room_snapshot(info.room_id).await.unwrap();
        assert_eq!(room.players, vec!["host".to_string()]);
    }

    #[tokio::test]
    async fn start_game_deals_a_hand_and_rejects_a_non_host_requester() {
        let registry = RoomRegistry::new(RoomTiming::default());
        let info = registry
            .create_room("table-3".into(), "host".into(), 6, 1, 2, 200, None)
            .unwrap();
        registry.join(info.room_id, "alice".into(), None).await.unwrap();

        let err = registry.start_game(info.room_id, "alice".into()).await.unwrap_err();
        assert_eq!(err, RoomError::NotHost);

        let game_id = registry.start_game(info.room_id, "host".into()).await.unwrap();
        assert_eq!(registry.room_id_by_game(game_id), Some(info.room_id));

        let snapshot = registry.game_snapshot(game_id, "host".into()).await.unwrap();
        assert_eq!(snapshot.phase, Phase::PreFlop);
    }
}
