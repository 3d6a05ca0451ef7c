//! Effects and notification events emitted by game operations.
//!
//! The engine never touches a timer or a socket itself. Instead every
//! mutating operation appends [`Effect`] values describing what the
//! shell must do afterwards: (re)arm or cancel the room's turn timer,
//! or hand a [`Notification`] to the transport layer for broadcast.
//! The shell drains these with [`GameService::take_effects`] after each
//! operation.
//!
//! [`GameService::take_effects`]: crate::GameService::take_effects

use hexcast_protocol::{RoomCode, RoomSummary, RoundResult, SessionId};
use serde::Serialize;

use crate::Room;

/// Where a notification should be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every client subscribed to the room's channel.
    Room(RoomCode),
    /// One specific client.
    Session(SessionId),
    /// Every connected client.
    Global,
}

/// A state-change announcement for the transport layer to broadcast.
///
/// `#[serde(tag = "type")]` gives each event a `"type"` discriminator in
/// JSON, which is what browser clients switch on.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Full room snapshot after any successful mutation.
    RoomUpdated { room: Room },
    /// The host started the match.
    GameStarted,
    /// A new round began: fresh turn order, cleared played-card slots.
    RoundStarted,
    /// The previous round resolved.
    RoundResult { result: RoundResult },
    /// Round 10 resolved; the room is finished.
    GameEnded,
    /// A player committed a card (the card itself stays hidden).
    CardPlayed { player: SessionId },
    /// Sent to a kicked player only.
    PlayerKicked,
    /// Server-wide room listing, refreshed on any membership change.
    RoomList { rooms: Vec<RoomSummary> },
}

/// A scoped event ready for fan-out. The engine never blocks on
/// delivery; the shell forwards these on an unbounded channel.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Who should receive it.
    pub scope: Scope,
    /// What happened.
    pub event: ServerEvent,
}

/// Something the shell must do after an operation returns.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Start (or restart) the room's single turn timer. Any previously
    /// armed timer for the room is dead: its generation no longer
    /// matches and its fire must be ignored.
    ArmTurnTimer { code: RoomCode, generation: u64 },

    /// Stop the room's turn timer without arming a new one.
    CancelTurnTimer { code: RoomCode },

    /// Deliver a notification.
    Notify(Notification),
}

impl Effect {
    /// A room-scoped notification.
    pub fn broadcast(code: RoomCode, event: ServerEvent) -> Self {
        Effect::Notify(Notification {
            scope: Scope::Room(code),
            event,
        })
    }

    /// A single-session notification.
    pub fn direct(session: SessionId, event: ServerEvent) -> Self {
        Effect::Notify(Notification {
            scope: Scope::Session(session),
            event,
        })
    }

    /// A server-wide notification.
    pub fn global(event: ServerEvent) -> Self {
        Effect::Notify(Notification {
            scope: Scope::Global,
            event,
        })
    }
}
