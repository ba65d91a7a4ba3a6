//! Fixed-step authoritative simulation: coin spawning, movement and scoring.

use crate::entity::{Coin, EntityStore, Player};
use log::debug;
use rand::Rng;
use shared::{GameConfig, Vector2};

/// A coin claimed by a player during one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub coin_id: String,
    pub player_id: String,
}

/// What happened during one simulation step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub spawned: Option<String>,
    pub collected: Vec<Collection>,
}

/// Advances the entity store one fixed tick at a time.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: GameConfig,
    next_coin_id: u64,
    last_coin_spawn: f64,
}

impl Simulation {
    pub fn new(config: GameConfig, now: f64) -> Self {
        Self {
            config,
            next_coin_id: 0,
            last_coin_spawn: now,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn reset_spawn_timer(&mut self, now: f64) {
        self.last_coin_spawn = now;
    }

    /// Places a coin uniformly inside the world, inset by the coin radius.
    pub fn spawn_coin<R: Rng>(&mut self, store: &mut EntityStore, rng: &mut R) -> String {
        let id = format!("coin_{}", self.next_coin_id);
        self.next_coin_id += 1;

        let position = random_position(
            rng,
            self.config.coin_radius,
            self.config.world_width,
            self.config.world_height,
        );
        store.add_coin(Coin::new(id.clone(), position));
        debug!("Spawned {} at ({:.1}, {:.1})", id, position.x, position.y);
        id
    }

    /// Runs one tick: spawn, integrate, then collect.
    pub fn step<R: Rng>(&mut self, store: &mut EntityStore, now: f64, rng: &mut R) -> StepReport {
        let mut report = StepReport::default();

        if now - self.last_coin_spawn > self.config.coin_spawn_interval {
            report.spawned = Some(self.spawn_coin(store, rng));
            self.last_coin_spawn = now;
        }

        self.integrate(store);
        report.collected = self.collect_coins(store);
        report
    }

    fn integrate(&self, store: &mut EntityStore) {
        let dt = self.config.tick_delta();
        let r = self.config.player_radius;
        let min = Vector2::new(r, r);
        let max = Vector2::new(self.config.world_width - r, self.config.world_height - r);

        for player in store.players_mut() {
            let velocity = player
                .input_direction
                .normalize()
                .scale(self.config.player_speed);
            player.position = player
                .position
                .add(&velocity.scale(dt))
                .clamp(&min, &max);
        }
    }

    /// Awards each coin to the first player (insertion order) within reach.
    ///
    /// Coins are only removed after the whole scan so no coin is evaluated
    /// twice and every removal matches exactly one score increment.
    fn collect_coins(&self, store: &mut EntityStore) -> Vec<Collection> {
        let reach = self.config.collision_distance();

        let collected: Vec<Collection> = store
            .coins()
            .iter()
            .filter_map(|coin| {
                store
                    .players()
                    .iter()
                    .find(|player| player.position.distance_to(&coin.position) < reach)
                    .map(|player| Collection {
                        coin_id: coin.id.clone(),
                        player_id: player.id.clone(),
                    })
            })
            .collect();

        for collection in &collected {
            if let Some(player) = store.player_mut(&collection.player_id) {
                player.score += 1;
            }
            store.remove_coin(&collection.coin_id);
            debug!("{} collected {}", collection.player_id, collection.coin_id);
        }

        collected
    }
}

/// Uniform position with each axis in `[inset, extent - inset]`.
pub fn random_position<R: Rng>(rng: &mut R, inset: f32, width: f32, height: f32) -> Vector2 {
    Vector2::new(
        random_axis(rng, inset, width - inset),
        random_axis(rng, inset, height - inset),
    )
}

fn random_axis<R: Rng>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

/// Player spawn: random position inside the bounds and a bright random colour.
pub fn spawn_player<R: Rng>(id: String, config: &GameConfig, rng: &mut R) -> Player {
    let position = random_position(
        rng,
        config.player_radius,
        config.world_width,
        config.world_height,
    );
    let color = [
        rng.gen_range(50..=255),
        rng.gen_range(50..=255),
        rng.gen_range(50..=255),
    ];
    Player::new(id, position, color)
}
