//! Types shared by the coin collector server and client: world configuration,
//! the JSON wire protocol, snapshot values, 2D math and the clock abstraction.

pub mod clock;
pub mod config;
pub mod math;
pub mod protocol;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::GameConfig;
pub use math::Vector2;
pub use protocol::{
    decode_client, decode_server, encode, ClientMessage, CoinView, PlayerView, ProtocolError,
    ServerMessage, Snapshot,
};

/// RGB triple used for player colours.
pub type Rgb = [u8; 3];
