use crate::game::WorldInfo;
use crate::interpolation::RenderState;
use macroquad::prelude::*;
use shared::{PlayerView, Rgb};

const BACKGROUND: Color = Color::new(0.10, 0.10, 0.12, 1.0);
const COIN_FILL: Color = Color::new(1.0, 0.84, 0.0, 1.0);
const COIN_OUTLINE: Color = Color::new(0.72, 0.53, 0.04, 1.0);
const HUD_FONT: f32 = 18.0;

/// Per-frame inputs besides the world itself.
#[derive(Debug, Clone)]
pub struct FrameInfo<'a> {
    pub local_player: Option<&'a str>,
    pub game_started: bool,
    pub connected: bool,
    pub simulated_latency_ms: u64,
}

pub struct Renderer {
    world: WorldInfo,
}

impl Renderer {
    pub fn new(world: WorldInfo) -> Self {
        Renderer { world }
    }

    pub fn set_world(&mut self, world: WorldInfo) {
        self.world = world;
    }

    pub fn render(&self, state: &RenderState, frame: &FrameInfo) {
        clear_background(BACKGROUND);

        for coin in &state.coins {
            draw_circle(coin.x, coin.y, self.world.coin_radius, COIN_FILL);
            draw_circle_lines(coin.x, coin.y, self.world.coin_radius, 2.0, COIN_OUTLINE);
        }

        for player in state.players.values() {
            let is_local = frame.local_player == Some(player.id.as_str());
            self.draw_player(player, is_local);
        }

        self.draw_legend(state, frame.local_player);
        self.draw_status(frame);
    }

    fn draw_player(&self, player: &PlayerView, is_local: bool) {
        let radius = self.world.player_radius;
        draw_circle(player.x, player.y, radius, to_color(player.color));
        if is_local {
            draw_circle_lines(player.x, player.y, radius + 3.0, 3.0, WHITE);
        }

        let label = player.score.to_string();
        let size = measure_text(&label, None, HUD_FONT as u16, 1.0);
        draw_text(
            &label,
            player.x - size.width / 2.0,
            player.y + size.height / 2.0,
            HUD_FONT,
            BLACK,
        );
    }

    fn draw_legend(&self, state: &RenderState, local_player: Option<&str>) {
        let mut x = 10.0;
        for player in state.players.values() {
            let name = if local_player == Some(player.id.as_str()) {
                "YOU"
            } else {
                player.id.as_str()
            };
            let entry = format!("{}: {}", name, player.score);
            draw_text(&entry, x, 20.0, HUD_FONT, to_color(player.color));
            x += measure_text(&entry, None, HUD_FONT as u16, 1.0).width + 20.0;
        }
    }

    fn draw_status(&self, frame: &FrameInfo) {
        let bottom = self.world.height - 10.0;

        if !frame.connected {
            self.draw_centered("Disconnected", RED);
        } else if !frame.game_started {
            self.draw_centered("Waiting for players...", WHITE);
        } else {
            let caption = format!("Simulated latency: {} ms", frame.simulated_latency_ms);
            draw_text(&caption, 10.0, bottom, HUD_FONT, GRAY);
        }
    }

    fn draw_centered(&self, text: &str, color: Color) {
        let size = measure_text(text, None, 32, 1.0);
        draw_text(
            text,
            (self.world.width - size.width) / 2.0,
            self.world.height / 2.0,
            32.0,
            color,
        );
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb[0], rgb[1], rgb[2], 255)
}
