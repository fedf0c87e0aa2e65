//! Fans outbound messages out to every session attached to a room.
//!
//! Grounded in spec.md §4.6: delivery is best-effort, a failure on one
//! session never blocks the others, and closed sessions are garbage
//! collected on the next send rather than proactively. Game-state messages
//! are viewer-scoped (each session's hole cards differ), so unlike a plain
//! `tokio::sync::broadcast` fan-out, the broadcaster rebuilds the snapshot
//! once per attached session.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::engine::HandEngine;
use crate::room::messages::ServerMessage;
use crate::room::snapshot;

struct Session {
    player_name: String,
    sender: UnboundedSender<ServerMessage>,
}

#[derive(Default)]
pub struct Broadcaster {
    sessions: HashMap<Uuid, Session>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Broadcaster::default()
    }

    pub fn attach(&mut self, session_id: Uuid, player_name: String, sender: UnboundedSender<ServerMessage>) {
        self.sessions.insert(session_id, Session { player_name, sender });
    }

    pub fn detach(&mut self, session_id: Uuid) {
        self.sessions.remove(&session_id);
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Sends the same message to every attached session. Used for
    /// non-viewer-scoped events: joins, leaves, room closure, game start.
    pub fn broadcast_all(&mut self, build: impl Fn() -> ServerMessage) {
        self.sessions.retain(|_, session| session.sender.send(build()).is_ok());
    }

    /// Sends a viewer-scoped game snapshot to each session, built fresh per
    /// viewer so hole cards stay hidden from everyone but their owner.
    pub fn broadcast_snapshot(
        &mut self,
        engine: &HandEngine,
        room_id: Uuid,
        build: impl Fn(Uuid, snapshot::GameSnapshot) -> ServerMessage,
    ) {
        self.sessions.retain(|_, session| {
            let view = snapshot::snapshot(engine, &session.player_name);
            session.sender.send(build(room_id, view)).is_ok()
        });
    }
}
