//! JSON wire protocol between server and client.
//!
//! Every message is a JSON object whose `type` field selects the variant.
//! Unknown `type` values fail to decode and are ignored by the receiver.

use crate::math::Vector2;
use crate::Rgb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported frame type")]
    UnsupportedFrame,
}

/// Client → server messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Movement direction; each component is -1, 0 or 1.
    Input {
        #[serde(default)]
        input_x: f32,
        #[serde(default)]
        input_y: f32,
    },
}

/// Server → client messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Init {
        player_id: String,
        game_width: f32,
        game_height: f32,
        player_radius: f32,
        coin_radius: f32,
    },
    GameStart,
    StateUpdate(Snapshot),
}

/// Public view of a player as broadcast to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub score: u32,
    pub color: Rgb,
}

impl PlayerView {
    pub fn position(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinView {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

impl CoinView {
    pub fn position(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

/// Timestamped copy of all entity state, the unit of synchronization.
///
/// `timestamp` is in seconds since the UNIX epoch. Players and coins keep the
/// server's insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: f64,
    pub players: Vec<PlayerView>,
    pub coins: Vec<CoinView>,
}

impl Snapshot {
    pub fn player(&self, id: &str) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }
}

pub fn encode<T: Serialize>(message: &T) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}

pub fn decode_client(text: &str) -> Result<ClientMessage, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

pub fn decode_server(text: &str) -> Result<ServerMessage, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_init_wire_shape() {
        let message = ServerMessage::Init {
            player_id: "player_0".to_string(),
            game_width: 500.0,
            game_height: 375.0,
            player_radius: 25.0,
            coin_radius: 15.0,
        };

        let value: Value = serde_json::from_str(&encode(&message).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "init",
                "player_id": "player_0",
                "game_width": 500.0,
                "game_height": 375.0,
                "player_radius": 25.0,
                "coin_radius": 15.0,
            })
        );
    }

    #[test]
    fn test_game_start_wire_shape() {
        let text = encode(&ServerMessage::GameStart).unwrap();
        assert_eq!(text, r#"{"type":"game_start"}"#);
    }

    #[test]
    fn test_state_update_is_flat() {
        let snapshot = Snapshot {
            timestamp: 12.5,
            players: vec![PlayerView {
                id: "player_1".to_string(),
                x: 10.0,
                y: 20.0,
                score: 3,
                color: [255, 100, 50],
            }],
            coins: vec![CoinView {
                id: "coin_0".to_string(),
                x: 40.0,
                y: 60.0,
            }],
        };

        let value: Value =
            serde_json::from_str(&encode(&ServerMessage::StateUpdate(snapshot)).unwrap()).unwrap();
        assert_eq!(value["type"], "state_update");
        assert_eq!(value["timestamp"], 12.5);
        assert_eq!(value["players"][0]["id"], "player_1");
        assert_eq!(value["players"][0]["score"], 3);
        assert_eq!(value["players"][0]["color"], json!([255, 100, 50]));
        assert_eq!(value["coins"][0]["x"], 40.0);
    }

    #[test]
    fn test_decode_input() {
        let message = decode_client(r#"{"type":"input","input_x":-1,"input_y":1}"#).unwrap();
        assert_eq!(
            message,
            ClientMessage::Input {
                input_x: -1.0,
                input_y: 1.0
            }
        );
    }

    #[test]
    fn test_decode_input_missing_components_default_to_zero() {
        let message = decode_client(r#"{"type":"input","input_y":1}"#).unwrap();
        assert_eq!(
            message,
            ClientMessage::Input {
                input_x: 0.0,
                input_y: 1.0
            }
        );
    }

    #[test]
    fn test_decode_rejects_unknown_and_malformed() {
        assert!(decode_client(r#"{"type":"teleport","x":1}"#).is_err());
        assert!(decode_client("not json").is_err());
        assert!(decode_client(r#"{"input_x":1}"#).is_err());
        assert!(decode_server(r#"{"type":"chat"}"#).is_err());
    }

    #[test]
    fn test_decode_state_update_from_foreign_encoder() {
        let text = r#"{"type": "state_update", "timestamp": 1.25,
            "players": [{"id": "player_0", "x": 1, "y": 2, "score": 0, "color": [50, 60, 70]}],
            "coins": []}"#;

        match decode_server(text).unwrap() {
            ServerMessage::StateUpdate(snapshot) => {
                assert_eq!(snapshot.timestamp, 1.25);
                assert_eq!(snapshot.player("player_0").unwrap().color, [50, 60, 70]);
                assert!(snapshot.player("player_1").is_none());
                assert!(snapshot.coins.is_empty());
            }
            other => panic!("Wrong message type: {:?}", other),
        }
    }
}
