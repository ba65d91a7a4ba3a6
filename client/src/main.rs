use clap::Parser;
use client::config::ClientConfig;
use client::game::ClientGameState;
use client::input::{InputDirection, InputManager};
use client::network;
use client::rendering::{FrameInfo, Renderer};
use log::{error, info};
use macroquad::prelude::*;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket URL of the server
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8765")]
    server: String,

    /// Maximum number of buffered snapshots
    #[arg(long, default_value = "40")]
    snapshot_capacity: usize,

    /// Seconds the rendered view trails the wall clock
    #[arg(long, default_value = "0.35")]
    interpolation_offset: f64,

    /// Frame rate cap
    #[arg(long, default_value = "120")]
    fps: u32,

    /// Input messages per second
    #[arg(long, default_value = "60")]
    input_rate: u32,

    /// Server-side latency in seconds, shown in the HUD
    #[arg(short = 'l', long, default_value = "0.2")]
    latency: f64,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            server_url: self.server.clone(),
            snapshot_capacity: self.snapshot_capacity,
            interpolation_offset: self.interpolation_offset,
            render_fps: self.fps,
            input_rate: self.input_rate,
            simulated_latency: self.latency,
        }
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Coin Collector".to_owned(),
        window_width: 500,
        window_height: 375,
        ..Default::default()
    }
}

fn now_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().client_config();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            return;
        }
    };

    let state = ClientGameState::shared(&config);
    let (input_tx, input_rx) = watch::channel(InputDirection::default());

    {
        let state = state.clone();
        let url = config.server_url.clone();
        let input_rate = config.input_rate;
        runtime.spawn(async move {
            if let Err(e) = network::run(&url, state, input_rx, input_rate).await {
                error!("Connection error: {}", e);
            }
        });
    }

    info!("Controls: WASD or arrow keys to move, Escape to quit");

    let input = InputManager::new();
    let mut renderer = Renderer::new(Default::default());
    let mut resized = false;
    let frame_time = Duration::from_secs_f64(1.0 / config.render_fps.max(1) as f64);
    let latency_ms = (config.simulated_latency * 1000.0).round() as u64;

    loop {
        let frame_start = Instant::now();

        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        input_tx.send_replace(input.sample());

        let (render_state, player_id, world, game_started, connected) = {
            let state = network::lock_state(&state);
            (
                state.render_state(now_seconds()),
                state.player_id.clone(),
                state.world,
                state.game_started,
                state.running,
            )
        };

        if player_id.is_some() && !resized {
            request_new_screen_size(world.width, world.height);
            renderer.set_world(world);
            resized = true;
        }

        renderer.render(
            &render_state,
            &FrameInfo {
                local_player: player_id.as_deref(),
                game_started,
                connected,
                simulated_latency_ms: latency_ms,
            },
        );

        next_frame().await;

        if let Some(remaining) = frame_time.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    runtime.shutdown_background();
}
