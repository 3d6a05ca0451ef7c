//! Round resolution: the pure scoring function.
//!
//! Given every play committed this round, [`score_round`] computes the
//! star delta for each player. Plays are first summed per element, then
//! elements fight along the counter wheel, and whatever elements remain
//! untouched fall through to the leftover comparison. Whichever side
//! wins, each player on it gains their *own* card's stars and each
//! player on the losing side loses theirs, so deltas are not zero-sum.

use std::collections::{HashMap, HashSet};

use hexcast_protocol::{Element, SessionId};

/// One committed card, detached from the room it came from.
#[derive(Debug, Clone, Copy)]
pub struct Play {
    pub player: SessionId,
    pub stars: u8,
    pub element: Element,
}

/// Scores a finished round. Returns the star delta per player; players
/// whose element drew (or tied the leftover comparison) get delta 0.
pub fn score_round(plays: &[Play]) -> HashMap<SessionId, i32> {
    let mut totals: HashMap<Element, i32> = HashMap::new();
    for play in plays {
        *totals.entry(play.element).or_insert(0) += i32::from(play.stars);
    }

    let mut deltas: HashMap<SessionId, i32> = HashMap::new();
    for play in plays {
        deltas.insert(play.player, 0);
    }

    let mut resolved: HashSet<Element> = HashSet::new();

    // Counter pass. Walking Element::ALL keeps resolution order fixed
    // regardless of hash-map iteration order.
    for attacker in Element::ALL {
        let defender = attacker.counters();
        if !totals.contains_key(&attacker) || !totals.contains_key(&defender) {
            continue;
        }
        resolved.insert(attacker);
        resolved.insert(defender);

        let attack = totals[&attacker];
        let defense = totals[&defender];
        if defense == 2 * attack {
            // Exact double: stand-off, nobody moves.
            continue;
        }
        // Above double the countered element wins on raw weight;
        // otherwise the counter holds.
        let winner = if defense > 2 * attack { defender } else { attacker };
        let loser = if winner == defender { attacker } else { defender };
        swing(&mut deltas, plays, winner, loser);
    }

    // Leftover pass: elements no counter pair touched.
    let leftovers: Vec<Element> = Element::ALL
        .into_iter()
        .filter(|e| totals.contains_key(e) && !resolved.contains(e))
        .collect();

    match leftovers.len() {
        0 => {}
        1 if resolved.is_empty() => {
            // Whole round was one element: the highest cards win and
            // the rest lose, unless everyone tied at the top.
            let top = plays.iter().map(|p| p.stars).max().unwrap_or(0);
            let winners = plays.iter().filter(|p| p.stars == top).count();
            if winners < plays.len() {
                for play in plays {
                    let entry = deltas.entry(play.player).or_insert(0);
                    if play.stars == top {
                        *entry += i32::from(play.stars);
                    } else {
                        *entry -= i32::from(play.stars);
                    }
                }
            }
        }
        1 => {
            // One element survived the counter pass alongside resolved
            // pairs. It neither gains nor loses.
        }
        _ => {
            // Several untouched elements: the heaviest totals win and
            // the lighter ones lose, unless all tie.
            let top =
                leftovers.iter().map(|e| totals[e]).max().unwrap_or(0);
            let heavy: HashSet<Element> = leftovers
                .iter()
                .filter(|e| totals[*e] == top)
                .copied()
                .collect();
            if heavy.len() < leftovers.len() {
                let light: HashSet<Element> = leftovers
                    .iter()
                    .filter(|e| !heavy.contains(e))
                    .copied()
                    .collect();
                for play in plays {
                    let entry = deltas.entry(play.player).or_insert(0);
                    if heavy.contains(&play.element) {
                        *entry += i32::from(play.stars);
                    } else if light.contains(&play.element) {
                        *entry -= i32::from(play.stars);
                    }
                }
            }
        }
    }

    deltas
}

/// Applies one settled match-up: every player on the winning element
/// gains their own card's stars, every player on the losing element
/// loses theirs.
fn swing(
    deltas: &mut HashMap<SessionId, i32>,
    plays: &[Play],
    winner: Element,
    loser: Element,
) {
    for play in plays {
        let entry = deltas.entry(play.player).or_insert(0);
        if play.element == winner {
            *entry += i32::from(play.stars);
        } else if play.element == loser {
            *entry -= i32::from(play.stars);
        }
    }
}
