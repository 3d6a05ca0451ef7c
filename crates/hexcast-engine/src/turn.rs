//! Turn sequencing within a round: who plays, in what order, and what
//! happens when the last card lands.

use hexcast_protocol::{
    CardId, GameError, PlayerResult, RoundResult, SessionId,
};
use rand::seq::SliceRandom;
use tracing::debug;

use crate::config::RoomRules;
use crate::event::{Effect, ServerEvent};
use crate::resolver::{self, Play};
use crate::room::Room;

/// Begins the room's current round: fresh shuffled turn order, cleared
/// play flags, and an armed turn timer for the first player.
pub(crate) fn start_round(room: &mut Room, effects: &mut Vec<Effect>) {
    let mut order: Vec<SessionId> = room.players.keys().copied().collect();
    order.shuffle(&mut rand::rng());
    room.turn_order = order;
    room.current_turn_index = 0;

    for player in room.players.values_mut() {
        player.has_played = false;
        player.played_card = None;
    }

    debug!(room = %room.code, round = room.round, "round started");
    effects.push(Effect::broadcast(room.code.clone(), ServerEvent::RoundStarted));
    arm_turn_timer(room, effects);
}

/// Arms (or re-arms) the room's turn timer. Bumping the generation
/// invalidates any fire still in flight from the previous arming.
pub(crate) fn arm_turn_timer(room: &mut Room, effects: &mut Vec<Effect>) {
    room.timer_generation += 1;
    effects.push(Effect::ArmTurnTimer {
        code: room.code.clone(),
        generation: room.timer_generation,
    });
}

/// Cancels the room's turn timer. The generation bump also covers the
/// race where the old timer fired just before the cancel landed.
pub(crate) fn cancel_turn_timer(room: &mut Room, effects: &mut Vec<Effect>) {
    room.timer_generation += 1;
    effects.push(Effect::CancelTurnTimer {
        code: room.code.clone(),
    });
}

/// Commits a card for the session currently on turn, advances the
/// sequence, and resolves the round if this was the last play.
pub(crate) fn play_card(
    room: &mut Room,
    session: SessionId,
    card_id: CardId,
    rules: &RoomRules,
    effects: &mut Vec<Effect>,
) -> Result<(), GameError> {
    if room.current_turn() != Some(session) {
        return Err(GameError::NotYourTurn(session));
    }
    let player = room
        .players
        .get_mut(&session)
        .ok_or(GameError::NotYourTurn(session))?;
    let position = player
        .hand
        .iter()
        .position(|c| c.id == card_id)
        .ok_or(GameError::CardNotFound(card_id))?;

    let card = player.hand.remove(position);
    player.played_card = Some(card);
    player.has_played = true;
    room.current_turn_index += 1;

    effects.push(Effect::broadcast(
        room.code.clone(),
        ServerEvent::CardPlayed { player: session },
    ));

    if room.current_turn_index >= room.turn_order.len() {
        cancel_turn_timer(room, effects);
        close_round(room, rules, effects);
    } else {
        arm_turn_timer(room, effects);
    }
    Ok(())
}

/// Resolves the finished round: scores the plays, applies the deltas,
/// records the result, and either ends the match or starts the next
/// round.
pub(crate) fn close_round(
    room: &mut Room,
    rules: &RoomRules,
    effects: &mut Vec<Effect>,
) {
    let plays: Vec<Play> = room
        .turn_order
        .iter()
        .filter_map(|session| {
            let player = room.players.get(session)?;
            let card = player.played_card?;
            Some(Play {
                player: *session,
                stars: card.stars,
                element: card.element,
            })
        })
        .collect();

    let deltas = resolver::score_round(&plays);

    let mut results = Vec::with_capacity(plays.len());
    for session in room.turn_order.clone() {
        let Some(player) = room.players.get_mut(&session) else {
            // Departed mid-round; nothing to settle for them.
            continue;
        };
        let Some(card) = player.played_card else {
            continue;
        };
        let change = deltas.get(&session).copied().unwrap_or(0);
        player.stars += change;
        results.push(PlayerResult {
            player: session,
            card_stars: card.stars,
            card_element: card.element,
            change,
            new_total: player.stars,
        });
    }

    let result = RoundResult {
        round: room.round,
        results,
    };
    room.history.push(result.clone());
    effects.push(Effect::broadcast(
        room.code.clone(),
        ServerEvent::RoundResult { result },
    ));

    if room.round >= rules.total_rounds {
        room.status = hexcast_protocol::RoomStatus::Finished;
        debug!(room = %room.code, "match finished");
        effects.push(Effect::broadcast(room.code.clone(), ServerEvent::GameEnded));
    } else {
        room.round += 1;
        start_round(room, effects);
    }
}
