//! # Hexcast
//!
//! Authoritative server core for a session-based elemental card game.
//!
//! Clients create and join six-character rooms, and a host starts a
//! ten-round match: each round the players commit one card each in a
//! shuffled turn order (a 20-second timer forces the slowest hand), and
//! the round resolves along a six-element counter wheel.
//!
//! All game state lives inside a single actor task; [`GameHandle`] is
//! the way in, and a notification stream is the way out:
//!
//! ```rust,no_run
//! use hexcast::{GameServer, RoomRules, SessionId};
//!
//! # async fn demo() -> Result<(), hexcast::ServerError> {
//! let (game, mut notifications) = GameServer::spawn(RoomRules::default());
//!
//! let room = game.create_room(SessionId(1), "ada", None).await?;
//! game.join_room(SessionId(2), "grace", room.code.as_str()).await?;
//!
//! while let Some(note) = notifications.recv().await {
//!     // fan `note.event` out to the sockets covered by `note.scope`
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod handle;
mod server;

pub use error::ServerError;
pub use handle::GameHandle;
pub use server::GameServer;

pub use hexcast_engine::{
    Notification, Player, Room, RoomRules, Scope, ServerEvent,
};
pub use hexcast_protocol::{
    Card, CardId, Element, GameError, PlayerResult, RoomCode, RoomStatus,
    RoomSummary, RoundResult, SessionId,
};

/// Installs a `tracing` subscriber reading `RUST_LOG`, defaulting to
/// `info`. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
