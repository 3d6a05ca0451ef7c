//! Cheap-to-clone handle for talking to the game server actor.

use hexcast_engine::Room;
use hexcast_protocol::{CardId, RoomCode, RoomSummary, SessionId};
use tokio::sync::{mpsc, oneshot};

use crate::server::Command;
use crate::ServerError;

/// Handle to a running [`GameServer`]. One per connection handler is
/// the intended shape; cloning just clones an `mpsc::Sender`.
///
/// Every method round-trips through the actor, so results reflect the
/// state after the operation was applied — never a torn snapshot.
///
/// [`GameServer`]: crate::GameServer
#[derive(Clone)]
pub struct GameHandle {
    sender: mpsc::Sender<Command>,
}

impl GameHandle {
    pub(crate) fn new(sender: mpsc::Sender<Command>) -> Self {
        Self { sender }
    }

    /// Creates a room with this session as host. Infallible at the
    /// game level; only actor loss can fail it.
    pub async fn create_room(
        &self,
        session: SessionId,
        username: &str,
        max_players: Option<usize>,
    ) -> Result<Room, ServerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Command::CreateRoom {
                session,
                username: username.to_string(),
                max_players,
                reply: reply_tx,
            })
            .await
            .map_err(|_| ServerError::Unavailable)?;
        reply_rx.await.map_err(|_| ServerError::Unavailable)
    }

    /// Joins (or reconnects to) the room with this code.
    pub async fn join_room(
        &self,
        session: SessionId,
        username: &str,
        code: &str,
    ) -> Result<Room, ServerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Command::JoinRoom {
                session,
                username: username.to_string(),
                code: code.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| ServerError::Unavailable)?;
        Ok(reply_rx.await.map_err(|_| ServerError::Unavailable)??)
    }

    /// Removes the session from its room, returning the code it left.
    pub async fn leave_room(
        &self,
        session: SessionId,
    ) -> Result<Option<RoomCode>, ServerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Command::LeaveRoom {
                session,
                reply: reply_tx,
            })
            .await
            .map_err(|_| ServerError::Unavailable)?;
        reply_rx.await.map_err(|_| ServerError::Unavailable)
    }

    /// Sets the session's lobby ready flag.
    pub async fn toggle_ready(
        &self,
        session: SessionId,
        ready: bool,
    ) -> Result<Room, ServerError> {
        self.room_op(|reply| Command::ToggleReady {
            session,
            ready,
            reply,
        })
        .await
    }

    /// Host-only: starts the match.
    pub async fn start_game(
        &self,
        session: SessionId,
    ) -> Result<Room, ServerError> {
        self.room_op(|reply| Command::StartGame { session, reply })
            .await
    }

    /// Host-only: returns a finished room to the lobby.
    pub async fn reset_to_lobby(
        &self,
        session: SessionId,
    ) -> Result<Room, ServerError> {
        self.room_op(|reply| Command::ResetToLobby { session, reply })
            .await
    }

    /// Plays a card from the session's hand.
    pub async fn play_card(
        &self,
        session: SessionId,
        card: CardId,
    ) -> Result<Room, ServerError> {
        self.room_op(|reply| Command::PlayCard {
            session,
            card,
            reply,
        })
        .await
    }

    /// Host-only: removes another player from the room.
    pub async fn kick_player(
        &self,
        kicker: SessionId,
        target: SessionId,
    ) -> Result<Room, ServerError> {
        self.room_op(|reply| Command::KickPlayer {
            kicker,
            target,
            reply,
        })
        .await
    }

    /// Listing of every live room.
    pub async fn list_rooms(&self) -> Result<Vec<RoomSummary>, ServerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Command::ListRooms { reply: reply_tx })
            .await
            .map_err(|_| ServerError::Unavailable)?;
        reply_rx.await.map_err(|_| ServerError::Unavailable)
    }

    /// Snapshot of one room, matched case-insensitively by code.
    pub async fn room_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Room>, ServerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Command::RoomByCode {
                code: code.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| ServerError::Unavailable)?;
        reply_rx.await.map_err(|_| ServerError::Unavailable)
    }

    /// Stops the actor. Subsequent calls on any clone of this handle
    /// report [`ServerError::Unavailable`].
    pub async fn shutdown(&self) -> Result<(), ServerError> {
        self.sender
            .send(Command::Shutdown)
            .await
            .map_err(|_| ServerError::Unavailable)
    }

    /// Shared plumbing for the operations that reply with
    /// `Result<Room, GameError>`.
    async fn room_op(
        &self,
        make: impl FnOnce(
            oneshot::Sender<Result<Room, hexcast_protocol::GameError>>,
        ) -> Command,
    ) -> Result<Room, ServerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| ServerError::Unavailable)?;
        Ok(reply_rx.await.map_err(|_| ServerError::Unavailable)??)
    }
}
