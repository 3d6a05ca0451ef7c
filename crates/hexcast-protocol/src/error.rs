//! Error kinds shared by every game operation.
//!
//! All of these are caller-input or precondition violations — none is
//! process-fatal, and (with one documented exception) an operation that
//! returns an error leaves room state untouched.

use crate::{CardId, RoomCode, SessionId};

/// Errors a game operation can return to the caller.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The room code is unknown, or the session isn't mapped to a room.
    #[error("room not found")]
    RoomNotFound,

    /// The room's match has already started; it no longer accepts joins.
    #[error("game in room {0} has already started")]
    GameAlreadyStarted(RoomCode),

    /// The roster is at `max_players`.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// Another roster member already uses this name (case-insensitively).
    #[error("username {0:?} is already taken in this room")]
    UsernameTaken(String),

    /// The operation is reserved for the room's host.
    #[error("{0} is not the host")]
    NotHost(SessionId),

    /// Fewer players than the minimum needed to start.
    #[error("not enough players: have {have}, need {need}")]
    NotEnoughPlayers { have: usize, need: usize },

    /// At least one non-host member has not readied up.
    #[error("all other players must be ready")]
    PlayersNotReady,

    /// A lobby reset was requested before the match finished.
    #[error("game is not finished")]
    GameNotFinished,

    /// The session is not the player at the current turn position.
    #[error("not {0}'s turn")]
    NotYourTurn(SessionId),

    /// The card is not in the player's hand.
    #[error("card {0} not found in hand")]
    CardNotFound(CardId),

    /// The kick target is not in the kicker's room.
    #[error("target {0} not found in room")]
    TargetNotFound(SessionId),

    /// A host tried to kick themselves.
    #[error("cannot kick yourself")]
    SelfKick,

    /// The kick emptied the roster and the room was destroyed.
    ///
    /// Unlike every other variant this reports failure *after* the
    /// mutation took effect: the target is gone and so is the room.
    /// Callers must treat it as "succeeded, and the room no longer
    /// exists", not as a rejected no-op.
    #[error("room {0} is empty and has been deleted")]
    RoomDeleted(RoomCode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_descriptive() {
        assert_eq!(GameError::RoomNotFound.to_string(), "room not found");
        assert_eq!(
            GameError::RoomFull(RoomCode::new("AB12CD")).to_string(),
            "room AB12CD is full"
        );
        assert_eq!(
            GameError::NotEnoughPlayers { have: 2, need: 4 }.to_string(),
            "not enough players: have 2, need 4"
        );
        assert!(
            GameError::NotYourTurn(SessionId(3)).to_string().contains("S-3")
        );
    }
}
