//! Match rules shared by every room.

use std::time::Duration;

/// Tunable rules for rooms managed by one [`GameService`].
///
/// The defaults are the canonical game; tests shrink `turn_timeout`
/// to keep timer scenarios fast.
///
/// [`GameService`]: crate::GameService
#[derive(Debug, Clone)]
pub struct RoomRules {
    /// Roster cap used when a creator doesn't ask for one.
    pub default_max_players: usize,

    /// Minimum roster size to start a match.
    pub min_players: usize,

    /// Every player's star total at match start.
    pub starting_stars: i32,

    /// Cards dealt per hand; star values run 1..=hand_size.
    pub hand_size: u8,

    /// Rounds per match; the match finishes when this round resolves.
    pub total_rounds: u32,

    /// How long the current player gets before their lowest card is
    /// played for them.
    pub turn_timeout: Duration,
}

impl Default for RoomRules {
    fn default() -> Self {
        Self {
            default_max_players: 8,
            min_players: 4,
            starting_stars: 55,
            hand_size: 10,
            total_rounds: 10,
            turn_timeout: Duration::from_secs(20),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_match_the_canonical_game() {
        let rules = RoomRules::default();
        assert_eq!(rules.default_max_players, 8);
        assert_eq!(rules.min_players, 4);
        assert_eq!(rules.starting_stars, 55);
        assert_eq!(rules.hand_size, 10);
        assert_eq!(rules.total_rounds, 10);
        assert_eq!(rules.turn_timeout, Duration::from_secs(20));
    }
}
