//! Keyboard sampling into a movement direction

use macroquad::prelude::*;
use shared::ClientMessage;

/// Movement direction with each component in {-1, 0, 1}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputDirection {
    pub x: i8,
    pub y: i8,
}

impl InputDirection {
    /// Opposing keys cancel out. Up is negative y (screen coordinates).
    pub fn from_keys(left: bool, right: bool, up: bool, down: bool) -> Self {
        Self {
            x: right as i8 - left as i8,
            y: down as i8 - up as i8,
        }
    }

    pub fn to_message(self) -> ClientMessage {
        ClientMessage::Input {
            input_x: self.x as f32,
            input_y: self.y as f32,
        }
    }
}

/// Reads WASD and arrow keys each frame.
#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    pub fn sample(&self) -> InputDirection {
        InputDirection::from_keys(
            is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
            is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keys_is_zero() {
        assert_eq!(
            InputDirection::from_keys(false, false, false, false),
            InputDirection { x: 0, y: 0 }
        );
    }

    #[test]
    fn test_directions() {
        assert_eq!(InputDirection::from_keys(true, false, false, false).x, -1);
        assert_eq!(InputDirection::from_keys(false, true, false, false).x, 1);
        assert_eq!(InputDirection::from_keys(false, false, true, false).y, -1);
        assert_eq!(InputDirection::from_keys(false, false, false, true).y, 1);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        assert_eq!(
            InputDirection::from_keys(true, true, true, true),
            InputDirection::default()
        );
    }

    #[test]
    fn test_message_shape() {
        let message = InputDirection { x: -1, y: 1 }.to_message();
        assert_eq!(
            shared::encode(&message).unwrap(),
            r#"{"type":"input","input_x":-1.0,"input_y":1.0}"#
        );
    }
}
