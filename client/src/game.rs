use crate::config::ClientConfig;
use crate::interpolation::{RenderState, SnapshotBuffer};
use log::info;
use shared::{decode_server, ProtocolError, ServerMessage};
use std::sync::{Arc, Mutex};

/// Client state shared between the receive, input and render loops.
pub type SharedGameState = Arc<Mutex<ClientGameState>>;

/// World geometry announced by the server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldInfo {
    pub width: f32,
    pub height: f32,
    pub player_radius: f32,
    pub coin_radius: f32,
}

impl Default for WorldInfo {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 375.0,
            player_radius: 25.0,
            coin_radius: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientGameState {
    pub player_id: Option<String>,
    pub world: WorldInfo,
    pub game_started: bool,
    /// False once the connection is gone.
    pub running: bool,
    buffer: SnapshotBuffer,
    interpolation_offset: f64,
}

impl ClientGameState {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            player_id: None,
            world: WorldInfo::default(),
            game_started: false,
            running: true,
            buffer: SnapshotBuffer::new(config.snapshot_capacity),
            interpolation_offset: config.interpolation_offset,
        }
    }

    pub fn shared(config: &ClientConfig) -> SharedGameState {
        Arc::new(Mutex::new(Self::new(config)))
    }

    pub fn handle_text(&mut self, text: &str) -> Result<(), ProtocolError> {
        let message = decode_server(text)?;
        self.handle_message(message);
        Ok(())
    }

    pub fn handle_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Init {
                player_id,
                game_width,
                game_height,
                player_radius,
                coin_radius,
            } => {
                info!("Initialized as {}", player_id);
                self.player_id = Some(player_id);
                self.world = WorldInfo {
                    width: game_width,
                    height: game_height,
                    player_radius,
                    coin_radius,
                };
            }
            ServerMessage::GameStart => {
                info!("Game started!");
                self.game_started = true;
            }
            ServerMessage::StateUpdate(snapshot) => self.buffer.push(snapshot),
        }
    }

    /// Interpolated view at `now - interpolation_offset`; empty until the
    /// first snapshot arrives.
    pub fn render_state(&self, now: f64) -> RenderState {
        self.buffer
            .interpolate(now - self.interpolation_offset)
            .unwrap_or_default()
    }

    pub fn should_send_input(&self) -> bool {
        self.running && self.game_started && self.player_id.is_some()
    }

    pub fn mark_disconnected(&mut self) {
        if self.running {
            info!("Disconnected from server");
        }
        self.running = false;
    }

    pub fn buffered_snapshots(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn state() -> ClientGameState {
        ClientGameState::new(&ClientConfig::default())
    }

    fn update(timestamp: f64, x: f32) -> String {
        format!(
            r#"{{"type":"state_update","timestamp":{},"players":[{{"id":"player_0","x":{},"y":50.0,"score":0,"color":[255,0,0]}}],"coins":[]}}"#,
            timestamp, x
        )
    }

    #[test]
    fn test_init_sets_identity_and_world() {
        let mut state = state();
        state
            .handle_text(r#"{"type":"init","player_id":"player_1","game_width":800,"game_height":600,"player_radius":20,"coin_radius":10}"#)
            .unwrap();

        assert_eq!(state.player_id.as_deref(), Some("player_1"));
        assert_eq!(
            state.world,
            WorldInfo {
                width: 800.0,
                height: 600.0,
                player_radius: 20.0,
                coin_radius: 10.0
            }
        );
        assert!(!state.should_send_input());
    }

    #[test]
    fn test_input_only_after_start_and_while_running() {
        let mut state = state();
        state.handle_message(ServerMessage::Init {
            player_id: "player_0".to_string(),
            game_width: 500.0,
            game_height: 375.0,
            player_radius: 25.0,
            coin_radius: 15.0,
        });
        assert!(!state.should_send_input());

        state.handle_text(r#"{"type":"game_start"}"#).unwrap();
        assert!(state.should_send_input());

        state.mark_disconnected();
        assert!(!state.running);
        assert!(!state.should_send_input());
    }

    #[test]
    fn test_unknown_message_is_an_error_and_changes_nothing() {
        let mut state = state();
        assert!(state.handle_text(r#"{"type":"scoreboard"}"#).is_err());
        assert!(state.handle_text("garbage").is_err());
        assert!(state.player_id.is_none());
        assert_eq!(state.buffered_snapshots(), 0);
    }

    #[test]
    fn test_render_state_trails_wall_clock() {
        let mut state = state();
        state.handle_text(&update(100.0, 0.0)).unwrap();
        state.handle_text(&update(101.0, 100.0)).unwrap();

        let render = state.render_state(100.85);
        assert_approx_eq!(render.players["player_0"].x, 50.0, 1e-3);
    }

    #[test]
    fn test_render_state_empty_before_snapshots() {
        let state = state();
        assert_eq!(state.render_state(0.0), RenderState::default());
    }

    #[test]
    fn test_buffer_capacity_from_config() {
        let config = ClientConfig {
            snapshot_capacity: 3,
            ..ClientConfig::default()
        };
        let mut state = ClientGameState::new(&config);
        for i in 0..10 {
            state.handle_text(&update(i as f64, i as f32)).unwrap();
        }
        assert_eq!(state.buffered_snapshots(), 3);
    }
}
