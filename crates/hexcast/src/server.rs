//! The game server actor: one Tokio task that owns all game state.
//!
//! Every mutation — client operations and turn-timer expiries alike —
//! arrives as a [`Command`] on a single mpsc channel and is applied to
//! the [`GameService`] one at a time, so game logic never sees
//! concurrency. After each command the actor drains the service's
//! effect queue: notifications go out on the notification channel, and
//! timer effects spawn or abort sleeper tasks that feed
//! [`Command::TurnTimeout`] back into the same channel.

use std::collections::HashMap;
use std::time::Duration;

use hexcast_engine::{Effect, GameService, Notification, Room, RoomRules};
use hexcast_protocol::{CardId, GameError, RoomCode, RoomSummary, SessionId};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::GameHandle;

/// Commands sent to the game actor through its channel.
///
/// The `oneshot::Sender` in most variants is a reply channel: the
/// caller sends a command and waits for the response on it.
/// `TurnTimeout` has no reply — it comes from a timer task, not a
/// client.
pub(crate) enum Command {
    CreateRoom {
        session: SessionId,
        username: String,
        max_players: Option<usize>,
        reply: oneshot::Sender<Room>,
    },
    JoinRoom {
        session: SessionId,
        username: String,
        code: String,
        reply: oneshot::Sender<Result<Room, GameError>>,
    },
    LeaveRoom {
        session: SessionId,
        reply: oneshot::Sender<Option<RoomCode>>,
    },
    ToggleReady {
        session: SessionId,
        ready: bool,
        reply: oneshot::Sender<Result<Room, GameError>>,
    },
    StartGame {
        session: SessionId,
        reply: oneshot::Sender<Result<Room, GameError>>,
    },
    ResetToLobby {
        session: SessionId,
        reply: oneshot::Sender<Result<Room, GameError>>,
    },
    PlayCard {
        session: SessionId,
        card: CardId,
        reply: oneshot::Sender<Result<Room, GameError>>,
    },
    KickPlayer {
        kicker: SessionId,
        target: SessionId,
        reply: oneshot::Sender<Result<Room, GameError>>,
    },
    ListRooms {
        reply: oneshot::Sender<Vec<RoomSummary>>,
    },
    RoomByCode {
        code: String,
        reply: oneshot::Sender<Option<Room>>,
    },
    /// A turn timer expired. The generation lets the service discard
    /// fires that raced with a play, kick, or round change.
    TurnTimeout { code: RoomCode, generation: u64 },
    /// Stop the actor. Pending timers are aborted on the way out.
    Shutdown,
}

/// How many commands may queue before senders are backpressured.
const COMMAND_BUFFER: usize = 64;

/// Entry point for running the game server actor.
pub struct GameServer;

impl GameServer {
    /// Spawns the actor task and returns a cloneable [`GameHandle`]
    /// plus the stream of notifications to fan out to clients.
    pub fn spawn(
        rules: RoomRules,
    ) -> (GameHandle, mpsc::UnboundedReceiver<Notification>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();

        let actor = GameActor {
            turn_timeout: rules.turn_timeout,
            service: GameService::new(rules),
            timers: HashMap::new(),
            commands: command_rx,
            command_tx: command_tx.clone(),
            notifications: notify_tx,
        };
        tokio::spawn(actor.run());

        (GameHandle::new(command_tx), notify_rx)
    }
}

/// The actor's private state. Runs inside a Tokio task.
struct GameActor {
    turn_timeout: Duration,
    service: GameService,
    /// One live sleeper task per room with an armed turn timer.
    timers: HashMap<RoomCode, JoinHandle<()>>,
    commands: mpsc::Receiver<Command>,
    /// Cloned into timer tasks so expiries loop back as commands.
    command_tx: mpsc::Sender<Command>,
    notifications: mpsc::UnboundedSender<Notification>,
}

impl GameActor {
    async fn run(mut self) {
        info!("game server started");

        while let Some(cmd) = self.commands.recv().await {
            match cmd {
                Command::CreateRoom {
                    session,
                    username,
                    max_players,
                    reply,
                } => {
                    let room = self
                        .service
                        .create_room(session, &username, max_players);
                    let _ = reply.send(room);
                }
                Command::JoinRoom {
                    session,
                    username,
                    code,
                    reply,
                } => {
                    let result =
                        self.service.join_room(session, &username, &code);
                    let _ = reply.send(result);
                }
                Command::LeaveRoom { session, reply } => {
                    let _ = reply.send(self.service.leave_room(session));
                }
                Command::ToggleReady {
                    session,
                    ready,
                    reply,
                } => {
                    let _ =
                        reply.send(self.service.toggle_ready(session, ready));
                }
                Command::StartGame { session, reply } => {
                    let _ = reply.send(self.service.start_game(session));
                }
                Command::ResetToLobby { session, reply } => {
                    let _ = reply.send(self.service.reset_to_lobby(session));
                }
                Command::PlayCard {
                    session,
                    card,
                    reply,
                } => {
                    let _ = reply.send(self.service.play_card(session, card));
                }
                Command::KickPlayer {
                    kicker,
                    target,
                    reply,
                } => {
                    let _ =
                        reply.send(self.service.kick_player(kicker, target));
                }
                Command::ListRooms { reply } => {
                    let _ = reply.send(self.service.list_rooms());
                }
                Command::RoomByCode { code, reply } => {
                    let _ = reply.send(self.service.room_by_code(&code));
                }
                Command::TurnTimeout { code, generation } => {
                    // This timer has fired; drop its handle so a rearm
                    // doesn't abort an unrelated future task.
                    self.timers.remove(&code);
                    self.service.turn_timeout(&code, generation);
                }
                Command::Shutdown => {
                    info!("game server shutting down");
                    break;
                }
            }
            self.flush_effects();
        }

        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
        info!("game server stopped");
    }

    /// Applies everything the last operation asked for: timer
    /// (re)arming and cancellation plus notification fan-out.
    fn flush_effects(&mut self) {
        for effect in self.service.take_effects() {
            match effect {
                Effect::ArmTurnTimer { code, generation } => {
                    if let Some(old) = self.timers.remove(&code) {
                        old.abort();
                    }
                    debug!(room = %code, generation, "turn timer armed");
                    let tx = self.command_tx.clone();
                    let delay = self.turn_timeout;
                    let timer_code = code.clone();
                    let timer = tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx
                            .send(Command::TurnTimeout {
                                code: timer_code,
                                generation,
                            })
                            .await;
                    });
                    self.timers.insert(code, timer);
                }
                Effect::CancelTurnTimer { code } => {
                    if let Some(timer) = self.timers.remove(&code) {
                        timer.abort();
                        debug!(room = %code, "turn timer cancelled");
                    }
                }
                Effect::Notify(notification) => {
                    // Receiver gone means nobody is fanning out yet;
                    // dropping the event is fine.
                    let _ = self.notifications.send(notification);
                }
            }
        }
    }
}
