//! # Coin Collector Client Library
//!
//! Client side of the two-player coin collector. The client holds no game
//! logic of its own: it displays the authoritative server state and forwards
//! the local player's movement direction.
//!
//! ## Architecture Overview
//!
//! ### Snapshot Buffering
//! Every `state_update` from the server is appended to a bounded buffer of
//! timestamped snapshots. When the buffer is full the oldest snapshot is
//! dropped.
//!
//! ### Entity Interpolation
//! The renderer never draws the newest snapshot directly. It draws the world
//! as it was `interpolation_offset` seconds ago by blending the two buffered
//! snapshots that bracket that moment. This hides the irregular arrival of
//! updates at the cost of a fixed visual delay.
//!
//! ### Concurrency
//! Three loops share one [`game::ClientGameState`] behind a mutex:
//! - the network receive loop appends incoming messages,
//! - the input loop sends the latest direction at a fixed rate,
//! - the render loop samples the keyboard and draws interpolated frames.
//!
//! The lock is never held across an await point.
//!
//! ## Module Organization
//!
//! ### Config Module (`config`)
//! Client tuning: server URL, buffer capacity, interpolation offset and rates.
//!
//! ### Game Module (`game`)
//! Session state: assigned player id, world geometry, start and connection
//! flags, and the snapshot buffer.
//!
//! ### Input Module (`input`)
//! Maps WASD and arrow keys to a direction with components in {-1, 0, 1}.
//!
//! ### Interpolation Module (`interpolation`)
//! The snapshot buffer and the blending between snapshots.
//!
//! ### Network Module (`network`)
//! WebSocket connection, message dispatch and the input send loop.
//!
//! ### Rendering Module (`rendering`)
//! Draws coins, players, scores and status text with macroquad.

pub mod config;
pub mod game;
pub mod input;
pub mod interpolation;
pub mod network;
pub mod rendering;
