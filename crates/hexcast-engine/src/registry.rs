//! Room and session bookkeeping.

use std::collections::HashMap;

use hexcast_protocol::{RoomCode, RoomSummary, SessionId};

use crate::Room;

/// Owns every live room plus the session-to-room index.
///
/// The two maps move together: a session appears in `sessions` exactly
/// when it appears in some room's roster, and `sessions[s]` names that
/// room. [`GameService`] is responsible for keeping them in step.
///
/// [`GameService`]: crate::GameService
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) rooms: HashMap<RoomCode, Room>,
    pub(crate) sessions: HashMap<SessionId, RoomCode>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The room with this code, if it exists.
    pub fn room(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub(crate) fn room_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// The room this session currently belongs to.
    pub fn code_for(&self, session: SessionId) -> Option<&RoomCode> {
        self.sessions.get(&session)
    }

    pub(crate) fn insert_room(&mut self, room: Room) {
        self.rooms.insert(room.code.clone(), room);
    }

    pub(crate) fn remove_room(&mut self, code: &RoomCode) -> Option<Room> {
        self.rooms.remove(code)
    }

    /// Point a session at a room.
    pub(crate) fn bind(&mut self, session: SessionId, code: RoomCode) {
        self.sessions.insert(session, code);
    }

    /// Forget a session's room membership.
    pub(crate) fn unbind(&mut self, session: SessionId) -> Option<RoomCode> {
        self.sessions.remove(&session)
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Listing of every live room, sorted by code so the output is
    /// stable across calls.
    pub fn summaries(&self) -> Vec<RoomSummary> {
        summaries_of(&self.rooms)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

pub(crate) fn summaries_of(rooms: &HashMap<RoomCode, Room>) -> Vec<RoomSummary> {
    let mut out: Vec<RoomSummary> = rooms.values().map(Room::summary).collect();
    out.sort_by(|a, b| a.code.as_str().cmp(b.code.as_str()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::Player;

    fn room(code: &str, host: u64) -> Room {
        let host_player = Player::new(SessionId(host), "host", 55, true);
        Room::new(RoomCode::new(code), host_player, 8)
    }

    #[test]
    fn test_insert_and_lookup_room_by_code() {
        let mut reg = Registry::new();
        reg.insert_room(room("AAAAAA", 1));
        let code = RoomCode::new("AAAAAA");
        assert!(reg.contains(&code));
        assert_eq!(reg.room(&code).map(|r| r.host), Some(SessionId(1)));
        assert_eq!(reg.room_count(), 1);
    }

    #[test]
    fn test_bind_and_unbind_session_index() {
        let mut reg = Registry::new();
        let code = RoomCode::new("AAAAAA");
        reg.bind(SessionId(7), code.clone());
        assert_eq!(reg.code_for(SessionId(7)), Some(&code));
        assert_eq!(reg.unbind(SessionId(7)), Some(code));
        assert_eq!(reg.code_for(SessionId(7)), None);
    }

    #[test]
    fn test_summaries_sorted_by_code() {
        let mut reg = Registry::new();
        reg.insert_room(room("ZZZZZZ", 1));
        reg.insert_room(room("AAAAAA", 2));
        reg.insert_room(room("MMMMMM", 3));
        let summaries = reg.summaries();
        let codes: Vec<&str> =
            summaries.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["AAAAAA", "MMMMMM", "ZZZZZZ"]);
    }
}
