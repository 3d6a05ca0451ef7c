//! Core wire types: identifiers, elements, cards, and round results.
//!
//! These are the structures that get serialized to JSON and sent to
//! clients, so their serde shapes are part of the protocol — the tests
//! at the bottom pin the exact formats.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's current session handle.
///
/// Session handles are ephemeral: they identify one connection, not one
/// person. When a player reconnects they get a fresh `SessionId` and the
/// engine transfers their room state to it — the durable identity across
/// reconnects is the display name, not this handle.
///
/// `#[serde(transparent)]` makes `SessionId(42)` serialize as plain `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// A room's short join code: six characters, A–Z and 0–9.
///
/// Codes are generated server-side at room creation and typed in by
/// players, so lookups normalize to uppercase — `RoomCode::new("ab12cd")`
/// and `RoomCode::new("AB12CD")` are the same room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Wraps and normalizes a code string (uppercased).
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().to_uppercase())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A unique identifier for one dealt card instance.
///
/// Card ids are v4 UUIDs so that two cards with the same stars and
/// element are still distinguishable — "play card X" must be unambiguous
/// even across redeals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub Uuid);

impl CardId {
    /// Generates a fresh random card id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Elements and the counter wheel
// ---------------------------------------------------------------------------

/// The six elements, arranged in a fixed counter wheel.
///
/// The wheel is a single 6-cycle, not three symmetric pairs: each element
/// beats exactly one other and is beaten by exactly one other.
///
/// ```text
/// Fire → Ice → Wind → Earth → Electric → Water → Fire
/// ```
///
/// (`A → B` reads "A counters B".)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Ice,
    Wind,
    Earth,
    Electric,
    Water,
}

impl Element {
    /// Every element, in wheel order. Handy for uniform random draws.
    pub const ALL: [Element; 6] = [
        Element::Fire,
        Element::Ice,
        Element::Wind,
        Element::Earth,
        Element::Electric,
        Element::Water,
    ];

    /// The element this one counters (has natural advantage over).
    pub fn counters(self) -> Element {
        match self {
            Element::Fire => Element::Ice,
            Element::Ice => Element::Wind,
            Element::Wind => Element::Earth,
            Element::Earth => Element::Electric,
            Element::Electric => Element::Water,
            Element::Water => Element::Fire,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Element::Fire => "Fire",
            Element::Ice => "Ice",
            Element::Wind => "Wind",
            Element::Earth => "Earth",
            Element::Electric => "Electric",
            Element::Water => "Water",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// One dealt card. Immutable once created.
///
/// Star values are assigned at deal time (1..=10, one card per value
/// within a hand); the element is drawn uniformly at random per card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique per card instance.
    pub id: CardId,
    /// Strength, and the amount at stake when this card wins or loses.
    pub stars: u8,
    /// Position on the counter wheel.
    pub element: Element,
}

// ---------------------------------------------------------------------------
// Room status and listings
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// Waiting → Playing → Finished → (host reset) → Waiting
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    /// Lobby: accepting joins and ready toggles.
    Waiting,
    /// A match is running; rounds 1..=10.
    Playing,
    /// Round 10 has resolved. Only a host reset leaves this state.
    Finished,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoomStatus::Waiting => "WAITING",
            RoomStatus::Playing => "PLAYING",
            RoomStatus::Finished => "FINISHED",
        };
        f.write_str(name)
    }
}

/// One entry in the server-wide room listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    /// The room's join code.
    pub code: RoomCode,
    /// Current lifecycle state.
    pub status: RoomStatus,
    /// Number of players currently in the roster.
    pub player_count: usize,
}

// ---------------------------------------------------------------------------
// Round results
// ---------------------------------------------------------------------------

/// One player's line in a resolved round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    /// The session that played the card.
    pub player: SessionId,
    /// Stars on the played card.
    pub card_stars: u8,
    /// Element of the played card.
    pub card_element: Element,
    /// Star delta applied this round. Not zero-sum across players:
    /// each side of a counter stakes its *own* card's stars.
    pub change: i32,
    /// The player's running total after applying `change`.
    pub new_total: i32,
}

/// The resolved outcome of one round, appended to room history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Which round this was (1..=10).
    pub round: u32,
    /// Per-player outcomes, in that round's turn order.
    pub results: Vec<PlayerResult>,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_session_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&SessionId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_session_id_display() {
        assert_eq!(SessionId(7).to_string(), "S-7");
    }

    #[test]
    fn test_room_code_normalizes_to_uppercase() {
        assert_eq!(RoomCode::new("ab12cd"), RoomCode::new("AB12CD"));
        assert_eq!(RoomCode::new("ab12cd").as_str(), "AB12CD");
    }

    #[test]
    fn test_room_code_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomCode::new("XYZ123")).unwrap();
        assert_eq!(json, "\"XYZ123\"");
    }

    #[test]
    fn test_card_id_random_is_unique() {
        assert_ne!(CardId::random(), CardId::random());
    }

    // =====================================================================
    // Element wheel
    // =====================================================================

    #[test]
    fn test_counter_wheel_is_a_single_six_cycle() {
        // Walking the wheel from any element must visit all six before
        // returning to the start — symmetric pairs would close early.
        let mut current = Element::Fire;
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(current);
            current = current.counters();
        }
        assert_eq!(current, Element::Fire, "wheel must close after 6 steps");
        for el in Element::ALL {
            assert!(seen.contains(&el), "{el} missing from the wheel");
        }
    }

    #[test]
    fn test_counter_wheel_order() {
        assert_eq!(Element::Fire.counters(), Element::Ice);
        assert_eq!(Element::Ice.counters(), Element::Wind);
        assert_eq!(Element::Wind.counters(), Element::Earth);
        assert_eq!(Element::Earth.counters(), Element::Electric);
        assert_eq!(Element::Electric.counters(), Element::Water);
        assert_eq!(Element::Water.counters(), Element::Fire);
    }

    #[test]
    fn test_each_element_is_countered_exactly_once() {
        for target in Element::ALL {
            let attackers: Vec<_> = Element::ALL
                .into_iter()
                .filter(|el| el.counters() == target)
                .collect();
            assert_eq!(attackers.len(), 1, "{target} must have one counter");
        }
    }

    #[test]
    fn test_element_serializes_as_variant_name() {
        let json = serde_json::to_string(&Element::Electric).unwrap();
        assert_eq!(json, "\"Electric\"");
    }

    // =====================================================================
    // Room status
    // =====================================================================

    #[test]
    fn test_room_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&RoomStatus::Waiting).unwrap();
        assert_eq!(json, "\"WAITING\"");
        let json = serde_json::to_string(&RoomStatus::Finished).unwrap();
        assert_eq!(json, "\"FINISHED\"");
    }

    #[test]
    fn test_room_status_display() {
        assert_eq!(RoomStatus::Playing.to_string(), "PLAYING");
    }

    // =====================================================================
    // Round results
    // =====================================================================

    #[test]
    fn test_round_result_round_trip() {
        let result = RoundResult {
            round: 3,
            results: vec![PlayerResult {
                player: SessionId(1),
                card_stars: 7,
                card_element: Element::Wind,
                change: -7,
                new_total: 48,
            }],
        };
        let bytes = serde_json::to_vec(&result).unwrap();
        let decoded: RoundResult = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(result, decoded);
    }
}
