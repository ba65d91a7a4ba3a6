use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable world and timing parameters of a game session.
///
/// World dimensions and radii are sent to clients in the `init` message, so
/// clients never hardcode them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world_width: f32,
    pub world_height: f32,
    pub player_radius: f32,
    pub coin_radius: f32,
    /// Units per second.
    pub player_speed: f32,
    /// Simulation ticks per second.
    pub tick_rate: u32,
    /// Seconds between coin spawns while the session is active.
    pub coin_spawn_interval: f64,
    /// Coins spawned when the session becomes active.
    pub initial_coins: usize,
    /// Artificial delay before a state update reaches a client, in seconds.
    pub broadcast_latency: f64,
    /// Artificial delay before a received input is applied, in seconds.
    pub input_latency: f64,
    /// Player count at which the session starts.
    pub players_to_start: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 500.0,
            world_height: 375.0,
            player_radius: 25.0,
            coin_radius: 15.0,
            player_speed: 300.0,
            tick_rate: 120,
            coin_spawn_interval: 5.0,
            initial_coins: 5,
            broadcast_latency: 0.2,
            input_latency: 0.2,
            players_to_start: 2,
        }
    }
}

impl GameConfig {
    /// Fixed simulation step in seconds.
    pub fn tick_delta(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }

    /// Distance under which a player collects a coin.
    pub fn collision_distance(&self) -> f32 {
        self.player_radius + self.coin_radius
    }
}
