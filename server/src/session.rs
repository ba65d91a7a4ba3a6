//! Session controller and broadcast layer.
//!
//! A `Session` owns the entity store, the simulation, the connection registry
//! and a queue of deferred operations. Everything runs on the caller's
//! timeline: the network loop calls `connect`, `receive` and `disconnect` as
//! events arrive and `tick` once per fixed period. Delayed input application
//! and delayed state delivery are entries in the deferred queue, drained at
//! the start of every tick, so no lock is needed around the store.

use crate::client_manager::{ClientManager, ConnectionId, Outbound};
use crate::entity::EntityStore;
use crate::game::{spawn_player, Simulation, StepReport};
use crate::scheduler::DelayedQueue;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{decode_client, encode, ClientMessage, Clock, GameConfig, ServerMessage, Vector2};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting players until the start threshold is reached.
    Waiting,
    /// Simulating and broadcasting.
    Active,
    /// Every player left after the game started; the server should stop.
    Terminated,
}

#[derive(Debug)]
enum Deferred {
    ApplyInput { player_id: String, direction: Vector2 },
    Deliver { connection: ConnectionId, payload: Arc<str> },
}

pub struct Session<C: Clock, R: Rng = StdRng> {
    config: GameConfig,
    clock: C,
    rng: R,
    state: SessionState,
    store: EntityStore,
    simulation: Simulation,
    clients: ClientManager,
    deferred: DelayedQueue<Deferred>,
    next_player_id: u64,
    ticks: u64,
}

impl<C: Clock> Session<C, StdRng> {
    pub fn new(config: GameConfig, clock: C) -> Self {
        Self::with_rng(config, clock, StdRng::from_entropy())
    }
}

impl<C: Clock, R: Rng> Session<C, R> {
    pub fn with_rng(config: GameConfig, clock: C, rng: R) -> Self {
        let now = clock.now();
        Self {
            simulation: Simulation::new(config.clone(), now),
            config,
            clock,
            rng,
            state: SessionState::Waiting,
            store: EntityStore::new(),
            clients: ClientManager::new(),
            deferred: DelayedQueue::new(),
            next_player_id: 0,
            ticks: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state == SessionState::Terminated
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player_for(&self, connection: ConnectionId) -> Option<&str> {
        self.clients.player_for(connection)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pending_operations(&self) -> usize {
        self.deferred.len()
    }

    /// Admits a new connection: creates its player, sends `init`, and either
    /// starts the game or sends `game_start` straight away if it is running.
    pub fn connect(&mut self, sender: Outbound) -> ConnectionId {
        let player_id = format!("player_{}", self.next_player_id);
        self.next_player_id += 1;

        let player = spawn_player(player_id.clone(), &self.config, &mut self.rng);
        self.store.add_player(player);
        let connection = self.clients.register(player_id.clone(), sender);

        let init = ServerMessage::Init {
            player_id: player_id.clone(),
            game_width: self.config.world_width,
            game_height: self.config.world_height,
            player_radius: self.config.player_radius,
            coin_radius: self.config.coin_radius,
        };
        self.send_now(connection, &init);
        info!(
            "Player {} connected. Total players: {}",
            player_id,
            self.store.player_count()
        );

        match self.state {
            SessionState::Waiting if self.store.player_count() == self.config.players_to_start => {
                self.start();
            }
            SessionState::Active => self.send_now(connection, &ServerMessage::GameStart),
            _ => {}
        }

        connection
    }

    /// Removes the connection's player; an active session with no players
    /// left terminates.
    pub fn disconnect(&mut self, connection: ConnectionId) {
        let Some(player_id) = self.clients.unregister(connection) else {
            return;
        };
        self.store.remove_player(&player_id);
        info!(
            "Player {} disconnected. Total players: {}",
            player_id,
            self.store.player_count()
        );

        if self.state == SessionState::Active && self.store.player_count() == 0 {
            info!("All players disconnected, terminating session");
            self.state = SessionState::Terminated;
        }
    }

    /// Handles one inbound text frame. Malformed frames are logged and dropped.
    pub fn receive(&mut self, connection: ConnectionId, text: &str) {
        let Some(player_id) = self.clients.player_for(connection).map(str::to_owned) else {
            return;
        };

        match decode_client(text) {
            Ok(ClientMessage::Input { input_x, input_y }) => {
                let op = Deferred::ApplyInput {
                    player_id,
                    direction: Vector2::new(input_x, input_y),
                };
                self.defer(self.config.input_latency, op);
            }
            Err(e) => warn!("Ignoring message from {}: {}", player_id, e),
        }
    }

    /// Runs due deferred operations, then one simulation step and broadcast
    /// if the session is active.
    pub fn tick(&mut self) -> Option<StepReport> {
        let now = self.clock.now();
        for op in self.deferred.drain_due(now) {
            self.execute(op);
        }

        if self.state != SessionState::Active {
            return None;
        }

        let report = self
            .simulation
            .step(&mut self.store, now, &mut self.rng);
        self.broadcast_state(now);
        self.ticks += 1;

        if self.ticks % 120 == 0 {
            debug!(
                "Tick {}: {} players, {} coins, {} pending operations",
                self.ticks,
                self.store.player_count(),
                self.store.coin_count(),
                self.deferred.len()
            );
        }

        Some(report)
    }

    fn start(&mut self) {
        info!("Game started!");
        self.state = SessionState::Active;
        self.simulation.reset_spawn_timer(self.clock.now());

        for _ in 0..self.config.initial_coins {
            self.simulation.spawn_coin(&mut self.store, &mut self.rng);
        }

        for connection in self.clients.connection_ids() {
            self.send_now(connection, &ServerMessage::GameStart);
        }
    }

    /// Encodes the state once and schedules an independent delayed delivery
    /// for every connected client.
    fn broadcast_state(&mut self, now: f64) {
        let snapshot = self.store.snapshot(now);
        let payload: Arc<str> = match encode(&ServerMessage::StateUpdate(snapshot)) {
            Ok(text) => Arc::from(text),
            Err(e) => {
                warn!("Failed to encode state update: {}", e);
                return;
            }
        };

        for connection in self.clients.connection_ids() {
            let op = Deferred::Deliver {
                connection,
                payload: Arc::clone(&payload),
            };
            self.defer(self.config.broadcast_latency, op);
        }
    }

    fn defer(&mut self, delay: f64, op: Deferred) {
        if delay <= 0.0 {
            self.execute(op);
        } else {
            self.deferred.schedule(self.clock.now() + delay, op);
        }
    }

    fn execute(&mut self, op: Deferred) {
        match op {
            Deferred::ApplyInput {
                player_id,
                direction,
            } => {
                // The player may have left while the input was in flight.
                if let Some(player) = self.store.player_mut(&player_id) {
                    player.input_direction = direction;
                }
            }
            Deferred::Deliver {
                connection,
                payload,
            } => {
                self.clients.send_to(connection, payload);
            }
        }
    }

    fn send_now(&self, connection: ConnectionId, message: &ServerMessage) {
        match encode(message) {
            Ok(text) => {
                self.clients.send_to(connection, Arc::from(text));
            }
            Err(e) => warn!("Failed to encode message for {}: {}", connection, e),
        }
    }
}
