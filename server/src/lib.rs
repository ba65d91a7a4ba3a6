//! # Coin Collector Server Library
//!
//! Authoritative server for the two-player coin collector. It owns the
//! canonical game state, advances it on a fixed tick, and streams timestamped
//! snapshots to every client through an artificial-latency delivery path.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Simulation
//! Player movement, bounds clamping, coin spawning and coin collection all
//! run here. Clients never mutate game state; they only render what the
//! server broadcasts.
//!
//! ### Session Lifecycle
//! A session waits until the configured number of players has joined,
//! then runs until every player has left again:
//! - `Waiting`: players join and receive their `init` message
//! - `Active`: initial coins spawn, `game_start` goes out, ticks simulate
//! - `Terminated`: the last player left after the game started
//!
//! ### Simulated Latency
//! Inbound inputs and outbound state updates are both delayed by fixed,
//! configurable amounts. Each delayed operation is queued by due time and
//! executed by the tick loop, so every mutation of the entity store happens
//! on a single timeline.
//!
//! ## Module Organization
//!
//! ### Entity Module (`entity`)
//! Player and coin records with insertion-ordered storage and snapshots.
//!
//! ### Game Module (`game`)
//! The fixed-step simulation: spawn, integrate, collect.
//!
//! ### Scheduler Module (`scheduler`)
//! Deferred operations ordered by due time.
//!
//! ### Client Manager Module (`client_manager`)
//! Connection ↔ player association and per-connection outbound channels.
//!
//! ### Session Module (`session`)
//! Lifecycle state machine, delayed input application and state broadcast.
//!
//! ### Network Module (`network`)
//! WebSocket accept loop, per-connection tasks and the tick-driven main loop.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//! use shared::GameConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("127.0.0.1:8765", GameConfig::default()).await?;
//!
//!     // Accepts clients, ticks at the configured rate and returns once
//!     // every player has left a started game.
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod entity;
pub mod game;
pub mod network;
pub mod scheduler;
pub mod session;
