//! The synchronous core of the Hexcast game server.
//!
//! Everything in this crate is plain, deterministic, single-threaded
//! state manipulation — no async, no I/O, no timers. The async shell
//! (the `hexcast` crate) owns one [`GameService`] inside an actor task
//! and feeds it one operation at a time; real timers and notification
//! fan-out are driven by the [`Effect`] values each operation emits.
//!
//! # Key pieces
//!
//! - [`GameService`] — the operation surface: create/join/leave/kick,
//!   ready checks, start/reset, card plays, and the turn-timeout path
//! - [`Registry`] — room-by-code and session-to-room bookkeeping
//! - [`resolver`] — the pure round-scoring function
//! - [`Room`] / [`Player`] — the in-memory match state
//! - [`Effect`] / [`Notification`] — what the shell must do after an
//!   operation (arm or cancel a turn timer, broadcast an event)

mod config;
mod event;
mod registry;
pub mod resolver;
mod room;
mod service;
mod turn;

pub use config::RoomRules;
pub use event::{Effect, Notification, Scope, ServerEvent};
pub use registry::Registry;
pub use room::{Player, Room};
pub use service::GameService;
