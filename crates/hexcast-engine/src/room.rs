//! In-memory match state: rooms and the players inside them.

use std::collections::HashMap;

use hexcast_protocol::{
    Card, RoomCode, RoomStatus, RoomSummary, RoundResult, SessionId,
};
use serde::Serialize;

/// One participant in a room.
///
/// The `id` is the player's *current* session handle and changes on
/// reconnect; `username` is the durable identity that survives it.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    /// Current session handle. Rewritten when the player reconnects.
    pub id: SessionId,
    /// Display name, unique per room (case-insensitively).
    pub username: String,
    /// Remaining cards. Mutated only by removal when a card is played.
    pub hand: Vec<Card>,
    /// Running star total for the current match.
    pub stars: i32,
    /// Lobby ready flag. The host is implicitly ready.
    pub ready: bool,
    /// Whether this player has committed a card in the active round.
    pub has_played: bool,
    /// The committed card, set once per round and cleared at round start.
    pub played_card: Option<Card>,
}

impl Player {
    pub(crate) fn new(
        id: SessionId,
        username: &str,
        stars: i32,
        ready: bool,
    ) -> Self {
        Self {
            id,
            username: username.to_string(),
            hand: Vec::new(),
            stars,
            ready,
            has_played: false,
            played_card: None,
        }
    }
}

/// One isolated match instance.
///
/// A room exists only while its roster is non-empty — the service
/// destroys it the moment the last player is removed — and `host`
/// always names a current roster member.
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    /// Six-character join code, unique among live rooms.
    pub code: RoomCode,
    /// Roster cap.
    pub max_players: usize,
    /// Lifecycle state.
    pub status: RoomStatus,
    /// Roster keyed by session handle.
    pub players: HashMap<SessionId, Player>,
    /// Session handle of the current host.
    pub host: SessionId,
    /// 0 in the lobby, 1..=10 during play.
    pub round: u32,
    /// This round's play sequence: a permutation of the roster at
    /// round start. Entries are removed (not re-sorted) on a kick.
    pub turn_order: Vec<SessionId>,
    /// Index into `turn_order`; equal to its length exactly when the
    /// round is complete and about to resolve.
    pub current_turn_index: usize,
    /// Append-only record of resolved rounds.
    pub history: Vec<RoundResult>,
    /// Bumped every time the room's turn timer is armed or cancelled;
    /// a timeout fire carrying an older generation is stale.
    #[serde(skip)]
    pub(crate) timer_generation: u64,
}

impl Room {
    pub(crate) fn new(
        code: RoomCode,
        host_player: Player,
        max_players: usize,
    ) -> Self {
        let host = host_player.id;
        let mut players = HashMap::new();
        players.insert(host, host_player);
        Self {
            code,
            max_players,
            status: RoomStatus::Waiting,
            players,
            host,
            round: 0,
            turn_order: Vec::new(),
            current_turn_index: 0,
            history: Vec::new(),
            timer_generation: 0,
        }
    }

    /// The session whose turn it is, if the round is still open.
    pub fn current_turn(&self) -> Option<SessionId> {
        self.turn_order.get(self.current_turn_index).copied()
    }

    /// The roster member with this exact display name, if any.
    /// Exact match on purpose: this is the reconnect detector, and a
    /// reconnecting client sends back precisely the name it used.
    pub fn find_by_username(&self, username: &str) -> Option<SessionId> {
        self.players
            .values()
            .find(|p| p.username == username)
            .map(|p| p.id)
    }

    /// Whether any member's name matches case-insensitively. Guards
    /// *new* joins, so near-duplicate names can't coexist.
    pub fn username_taken(&self, username: &str) -> bool {
        let wanted = username.to_lowercase();
        self.players
            .values()
            .any(|p| p.username.to_lowercase() == wanted)
    }

    /// This room's line in the server-wide listing.
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            code: self.code.clone(),
            status: self.status,
            player_count: self.players.len(),
        }
    }

    /// Current turn-timer generation. Exposed for the timeout path:
    /// a fire is only honored if its generation still matches.
    pub fn timer_generation(&self) -> u64 {
        self.timer_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_with_host(name: &str) -> Room {
        let host = Player::new(SessionId(1), name, 55, true);
        Room::new(RoomCode::new("AB12CD"), host, 8)
    }

    #[test]
    fn test_new_room_starts_waiting_with_host_in_roster() {
        let room = room_with_host("alice");
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.host, SessionId(1));
        assert_eq!(room.players.len(), 1);
        assert_eq!(room.round, 0);
        assert!(room.history.is_empty());
    }

    #[test]
    fn test_current_turn_none_when_order_empty() {
        let room = room_with_host("alice");
        assert_eq!(room.current_turn(), None);
    }

    #[test]
    fn test_find_by_username_is_exact() {
        let room = room_with_host("Alice");
        assert_eq!(room.find_by_username("Alice"), Some(SessionId(1)));
        assert_eq!(room.find_by_username("alice"), None);
    }

    #[test]
    fn test_username_taken_is_case_insensitive() {
        let room = room_with_host("Alice");
        assert!(room.username_taken("ALICE"));
        assert!(room.username_taken("alice"));
        assert!(!room.username_taken("bob"));
    }

    #[test]
    fn test_room_snapshot_serializes_without_timer_generation() {
        let room = room_with_host("alice");
        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["code"], "AB12CD");
        assert_eq!(json["status"], "WAITING");
        assert!(json.get("timer_generation").is_none());
    }
}
