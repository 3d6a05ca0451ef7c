//! Top-level error type for callers of the server handle.

use hexcast_protocol::GameError;

/// What a [`GameHandle`] call can fail with: either the game itself
/// rejected the operation, or the server task is gone.
///
/// The `#[from]` attribute means `?` converts [`GameError`] values
/// automatically, so handle methods stay one-liners.
///
/// [`GameHandle`]: crate::GameHandle
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The operation reached the game and was rejected by its rules.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The server task has shut down; no reply will ever come.
    #[error("game server is unavailable")]
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexcast_protocol::SessionId;

    #[test]
    fn test_from_game_error() {
        let err: ServerError = GameError::NotHost(SessionId(3)).into();
        assert!(matches!(err, ServerError::Game(_)));
        assert!(err.to_string().contains("S-3"));
    }

    #[test]
    fn test_unavailable_message() {
        assert_eq!(
            ServerError::Unavailable.to_string(),
            "game server is unavailable"
        );
    }
}
