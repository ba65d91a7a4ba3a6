//! Canonical player and coin records owned by the authoritative server.

use shared::{CoinView, PlayerView, Rgb, Snapshot, Vector2};

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub position: Vector2,
    /// Last applied raw input; normalized by the simulation.
    pub input_direction: Vector2,
    pub score: u32,
    pub color: Rgb,
}

impl Player {
    pub fn new(id: impl Into<String>, position: Vector2, color: Rgb) -> Self {
        Self {
            id: id.into(),
            position,
            input_direction: Vector2::ZERO,
            score: 0,
            color,
        }
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id.clone(),
            x: self.position.x,
            y: self.position.y,
            score: self.score,
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub id: String,
    pub position: Vector2,
}

impl Coin {
    pub fn new(id: impl Into<String>, position: Vector2) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }

    pub fn view(&self) -> CoinView {
        CoinView {
            id: self.id.clone(),
            x: self.position.x,
            y: self.position.y,
        }
    }
}

/// Players and coins in insertion order.
///
/// Iteration order is insertion order so that the simulation resolves
/// simultaneous coin claims the same way on every run. Ids are unique within
/// each collection; inserting a duplicate id is rejected.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    players: Vec<Player>,
    coins: Vec<Coin>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if a player with the same id already exists.
    pub fn add_player(&mut self, player: Player) -> bool {
        if self.player(&player.id).is_some() {
            return false;
        }
        self.players.push(player);
        true
    }

    pub fn remove_player(&mut self, id: &str) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(index))
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Returns false if a coin with the same id already exists.
    pub fn add_coin(&mut self, coin: Coin) -> bool {
        if self.coins.iter().any(|c| c.id == coin.id) {
            return false;
        }
        self.coins.push(coin);
        true
    }

    pub fn remove_coin(&mut self, id: &str) -> Option<Coin> {
        let index = self.coins.iter().position(|c| c.id == id)?;
        Some(self.coins.remove(index))
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    /// Read-only copy of the current state for broadcasting.
    pub fn snapshot(&self, timestamp: f64) -> Snapshot {
        Snapshot {
            timestamp,
            players: self.players.iter().map(Player::view).collect(),
            coins: self.coins.iter().map(Coin::view).collect(),
        }
    }
}
