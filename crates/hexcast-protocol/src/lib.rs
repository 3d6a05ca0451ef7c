//! Shared vocabulary for the Hexcast game server.
//!
//! Everything the engine and the transport layer both need to talk about
//! lives here: identifier newtypes, the element wheel, cards, room status,
//! round results, and the typed error kinds every operation can return.
//!
//! These types are all `serde`-serializable — the transport layer ships
//! them to clients as JSON without translation.

mod error;
mod types;

pub use error::GameError;
pub use types::{
    CardId, Card, Element, PlayerResult, RoomCode, RoomStatus, RoomSummary,
    RoundResult, SessionId,
};
