//! The operation surface: every mutation a client (or the turn timer)
//! can ask for, applied one at a time.

use std::mem;

use hexcast_protocol::{
    Card, CardId, Element, GameError, RoomCode, RoomStatus, RoomSummary,
    SessionId,
};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::RoomRules;
use crate::event::{Effect, ServerEvent};
use crate::registry::Registry;
use crate::room::{Player, Room};
use crate::turn;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 6;

/// The authoritative game state behind the actor.
///
/// Not `Sync`, and doesn't need to be: the shell owns exactly one of
/// these inside its actor task and serializes every call. Each
/// operation appends to an internal [`Effect`] queue which the shell
/// drains with [`take_effects`] afterwards.
///
/// [`take_effects`]: GameService::take_effects
#[derive(Debug, Default)]
pub struct GameService {
    registry: Registry,
    rules: RoomRules,
    effects: Vec<Effect>,
}

impl GameService {
    pub fn new(rules: RoomRules) -> Self {
        Self {
            registry: Registry::new(),
            rules,
            effects: Vec::new(),
        }
    }

    /// Drains the effects queued by operations since the last drain.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        mem::take(&mut self.effects)
    }

    pub fn rules(&self) -> &RoomRules {
        &self.rules
    }

    // ------------------------------------------------------------------
    // Room lifecycle
    // ------------------------------------------------------------------

    /// Creates a room with a fresh unique code and this session as host.
    /// The host joins ready; everyone else has to toggle.
    pub fn create_room(
        &mut self,
        host: SessionId,
        username: &str,
        max_players: Option<usize>,
    ) -> Room {
        let code = self.generate_code();
        let max_players =
            max_players.unwrap_or(self.rules.default_max_players);
        let host_player =
            Player::new(host, username, self.rules.starting_stars, true);
        let room = Room::new(code.clone(), host_player, max_players);

        info!(room = %code, %host, username, "room created");
        self.registry.insert_room(room.clone());
        self.registry.bind(host, code.clone());

        self.push_room_update(&code);
        self.push_room_list();
        room
    }

    /// Joins (or reconnects to) the room with this code. Codes are
    /// matched case-insensitively.
    pub fn join_room(
        &mut self,
        session: SessionId,
        username: &str,
        code: &str,
    ) -> Result<Room, GameError> {
        let code = RoomCode::new(code);
        let rules = &self.rules;
        let room = self
            .registry
            .room_mut(&code)
            .ok_or(GameError::RoomNotFound)?;

        if room.status != RoomStatus::Waiting {
            return Err(GameError::GameAlreadyStarted(code));
        }
        if room.players.len() >= room.max_players {
            return Err(GameError::RoomFull(code));
        }

        if let Some(old) = room.find_by_username(username) {
            // Reconnect: the player record (hand, stars, ready flag)
            // carries over to the new session id.
            let Some(mut player) = room.players.remove(&old) else {
                return Err(GameError::RoomNotFound);
            };
            player.id = session;
            room.players.insert(session, player);
            if room.host == old {
                room.host = session;
            }
            for slot in &mut room.turn_order {
                if *slot == old {
                    *slot = session;
                }
            }
            self.registry.unbind(old);
            info!(room = %code, old = %old, new = %session, username, "player reconnected");
        } else {
            if room.username_taken(username) {
                return Err(GameError::UsernameTaken(username.to_string()));
            }
            let player =
                Player::new(session, username, rules.starting_stars, false);
            room.players.insert(session, player);
            info!(room = %code, %session, username, "player joined");
        }

        self.registry.bind(session, code.clone());
        self.push_room_update(&code);
        self.push_room_list();

        // Just inserted above, so the lookup can't miss; the clone is
        // the caller's snapshot.
        self.registry
            .room(&code)
            .cloned()
            .ok_or(GameError::RoomNotFound)
    }

    /// Removes the session from its room, if it was in one. Returns the
    /// room code that was left. An emptied room is destroyed; a
    /// departing host hands the room to an arbitrary remaining member.
    pub fn leave_room(&mut self, session: SessionId) -> Option<RoomCode> {
        let code = self.registry.unbind(session)?;
        let room = self.registry.room_mut(&code)?;

        room.players.remove(&session);
        info!(room = %code, %session, "player left");

        if room.players.is_empty() {
            turn::cancel_turn_timer(room, &mut self.effects);
            self.registry.remove_room(&code);
            info!(room = %code, "room destroyed");
            self.push_room_list();
            return Some(code);
        }

        if room.host == session {
            if let Some(next) = room.players.keys().next().copied() {
                room.host = next;
                debug!(room = %code, new_host = %next, "host reassigned");
            }
        }

        self.push_room_update(&code);
        self.push_room_list();
        Some(code)
    }

    /// Sets the session's lobby ready flag.
    pub fn toggle_ready(
        &mut self,
        session: SessionId,
        ready: bool,
    ) -> Result<Room, GameError> {
        let code = self.code_of(session)?;
        let room = self
            .registry
            .room_mut(&code)
            .ok_or(GameError::RoomNotFound)?;
        let player = room
            .players
            .get_mut(&session)
            .ok_or(GameError::RoomNotFound)?;

        player.ready = ready;
        self.push_room_update(&code);
        self.registry
            .room(&code)
            .cloned()
            .ok_or(GameError::RoomNotFound)
    }

    // ------------------------------------------------------------------
    // Match control
    // ------------------------------------------------------------------

    /// Host-only: deals every player a fresh hand, resets star totals,
    /// and starts round 1.
    pub fn start_game(
        &mut self,
        session: SessionId,
    ) -> Result<Room, GameError> {
        let code = self.code_of(session)?;
        let rules = self.rules.clone();
        let room = self
            .registry
            .room_mut(&code)
            .ok_or(GameError::RoomNotFound)?;

        if room.host != session {
            return Err(GameError::NotHost(session));
        }
        if room.players.len() < rules.min_players {
            return Err(GameError::NotEnoughPlayers {
                have: room.players.len(),
                need: rules.min_players,
            });
        }
        let host = room.host;
        if room
            .players
            .values()
            .any(|p| p.id != host && !p.ready)
        {
            return Err(GameError::PlayersNotReady);
        }

        room.status = RoomStatus::Playing;
        room.round = 1;
        room.history.clear();
        for player in room.players.values_mut() {
            player.stars = rules.starting_stars;
            player.hand = deal_hand(&rules);
        }

        info!(room = %code, players = room.players.len(), "game started");
        self.effects
            .push(Effect::broadcast(code.clone(), ServerEvent::GameStarted));
        turn::start_round(room, &mut self.effects);
        self.push_room_update(&code);
        self.registry
            .room(&code)
            .cloned()
            .ok_or(GameError::RoomNotFound)
    }

    /// Host-only, finished rooms only: back to the lobby. Star totals
    /// survive until the next `start_game` resets them.
    pub fn reset_to_lobby(
        &mut self,
        session: SessionId,
    ) -> Result<Room, GameError> {
        let code = self.code_of(session)?;
        let room = self
            .registry
            .room_mut(&code)
            .ok_or(GameError::RoomNotFound)?;

        if room.host != session {
            return Err(GameError::NotHost(session));
        }
        if room.status != RoomStatus::Finished {
            return Err(GameError::GameNotFinished);
        }

        room.status = RoomStatus::Waiting;
        room.round = 0;
        room.history.clear();
        room.turn_order.clear();
        room.current_turn_index = 0;
        for player in room.players.values_mut() {
            player.ready = false;
            player.has_played = false;
            player.played_card = None;
            player.hand.clear();
        }

        info!(room = %code, "room reset to lobby");
        self.push_room_update(&code);
        self.registry
            .room(&code)
            .cloned()
            .ok_or(GameError::RoomNotFound)
    }

    // ------------------------------------------------------------------
    // In-round actions
    // ------------------------------------------------------------------

    /// Plays a card from the session's hand. Only valid on their turn.
    pub fn play_card(
        &mut self,
        session: SessionId,
        card_id: CardId,
    ) -> Result<Room, GameError> {
        let code = self.code_of(session)?;
        let room = self
            .registry
            .room_mut(&code)
            .ok_or(GameError::RoomNotFound)?;

        turn::play_card(room, session, card_id, &self.rules, &mut self.effects)?;
        self.push_room_update(&code);
        self.registry
            .room(&code)
            .cloned()
            .ok_or(GameError::RoomNotFound)
    }

    /// Host-only: removes another player from the room entirely.
    pub fn kick_player(
        &mut self,
        kicker: SessionId,
        target: SessionId,
    ) -> Result<Room, GameError> {
        let code = self.code_of(kicker)?;
        let room = self
            .registry
            .room_mut(&code)
            .ok_or(GameError::RoomNotFound)?;

        if room.host != kicker {
            return Err(GameError::NotHost(kicker));
        }
        if kicker == target {
            return Err(GameError::SelfKick);
        }
        if !room.players.contains_key(&target) {
            return Err(GameError::TargetNotFound(target));
        }

        let held_turn = room.current_turn() == Some(target);
        room.players.remove(&target);
        room.turn_order.retain(|s| *s != target);

        info!(room = %code, %kicker, %target, "player kicked");
        self.effects
            .push(Effect::direct(target, ServerEvent::PlayerKicked));

        if room.players.is_empty() {
            // Unreachable through this API today (the kicker is still a
            // member), but the destroy path is kept symmetric with
            // leave_room.
            turn::cancel_turn_timer(room, &mut self.effects);
            self.registry.remove_room(&code);
            self.registry.unbind(target);
            self.push_room_list();
            return Err(GameError::RoomDeleted(code));
        }

        if held_turn
            || (room.current_turn_index > 0
                && room.current_turn_index >= room.turn_order.len())
        {
            room.current_turn_index = 0;
            turn::arm_turn_timer(room, &mut self.effects);
        }

        self.registry.unbind(target);
        self.push_room_update(&code);
        self.push_room_list();
        self.registry
            .room(&code)
            .cloned()
            .ok_or(GameError::RoomNotFound)
    }

    /// Turn-timer expiry: force the current player's lowest-star card.
    /// Infallible by design — a stale or irrelevant fire is dropped.
    pub fn turn_timeout(&mut self, code: &RoomCode, generation: u64) {
        let Some(room) = self.registry.room_mut(code) else {
            debug!(room = %code, "timeout for missing room ignored");
            return;
        };
        if room.timer_generation != generation {
            debug!(
                room = %code,
                fired = generation,
                current = room.timer_generation,
                "stale turn timeout ignored"
            );
            return;
        }
        let Some(session) = room.current_turn() else {
            return;
        };
        let Some(player) = room.players.get(&session) else {
            warn!(room = %code, %session, "turn held by departed player");
            return;
        };
        let Some(card) = player.hand.iter().min_by_key(|c| c.stars).copied()
        else {
            warn!(room = %code, %session, "timed-out player has no cards");
            return;
        };

        info!(room = %code, %session, stars = card.stars, "turn timed out, forcing lowest card");
        match turn::play_card(room, session, card.id, &self.rules, &mut self.effects)
        {
            Ok(()) => self.push_room_update(code),
            Err(err) => warn!(room = %code, %session, %err, "forced play failed"),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        self.registry.summaries()
    }

    pub fn room_by_code(&self, code: &str) -> Option<Room> {
        self.registry.room(&RoomCode::new(code)).cloned()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn code_of(&self, session: SessionId) -> Result<RoomCode, GameError> {
        self.registry
            .code_for(session)
            .cloned()
            .ok_or(GameError::RoomNotFound)
    }

    fn generate_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        loop {
            let raw: String = (0..CODE_LEN)
                .map(|_| {
                    let i = rng.random_range(0..CODE_ALPHABET.len());
                    CODE_ALPHABET[i] as char
                })
                .collect();
            let code = RoomCode::new(raw);
            if !self.registry.contains(&code) {
                return code;
            }
        }
    }

    fn push_room_update(&mut self, code: &RoomCode) {
        if let Some(room) = self.registry.room(code) {
            let snapshot = room.clone();
            self.effects.push(Effect::broadcast(
                code.clone(),
                ServerEvent::RoomUpdated { room: snapshot },
            ));
        }
    }

    fn push_room_list(&mut self) {
        let rooms = self.registry.summaries();
        self.effects
            .push(Effect::global(ServerEvent::RoomList { rooms }));
    }
}

/// Deals one hand: star values 1..=hand_size, each with an
/// independently uniform element.
fn deal_hand(rules: &RoomRules) -> Vec<Card> {
    let mut rng = rand::rng();
    (1..=rules.hand_size)
        .map(|stars| Card {
            id: CardId::random(),
            stars,
            element: Element::ALL[rng.random_range(0..Element::ALL.len())],
        })
        .collect()
}
