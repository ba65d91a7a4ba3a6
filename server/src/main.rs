use clap::Parser;
use log::info;
use server::network::Server;
use shared::GameConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Authoritative coin collector server", long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8765")]
    port: u16,

    /// World width in units
    #[arg(long, default_value = "500")]
    width: f32,

    /// World height in units
    #[arg(long, default_value = "375")]
    height: f32,

    #[arg(long, default_value = "25")]
    player_radius: f32,

    #[arg(long, default_value = "15")]
    coin_radius: f32,

    /// Player speed in units per second
    #[arg(long, default_value = "300")]
    player_speed: f32,

    /// Simulation ticks per second
    #[arg(short, long, default_value = "120")]
    tick_rate: u32,

    /// Seconds between coin spawns
    #[arg(long, default_value = "5.0")]
    coin_spawn_interval: f64,

    /// Coins spawned when the game starts
    #[arg(long, default_value = "5")]
    initial_coins: usize,

    /// Artificial delay on outgoing state updates, in seconds
    #[arg(long, default_value = "0.2")]
    broadcast_latency: f64,

    /// Artificial delay before received input is applied, in seconds
    #[arg(long, default_value = "0.2")]
    input_latency: f64,

    /// Number of players required to start the game
    #[arg(long, default_value = "2")]
    players_to_start: usize,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            world_width: self.width,
            world_height: self.height,
            player_radius: self.player_radius,
            coin_radius: self.coin_radius,
            player_speed: self.player_speed,
            tick_rate: self.tick_rate,
            coin_spawn_interval: self.coin_spawn_interval,
            initial_coins: self.initial_coins,
            broadcast_latency: self.broadcast_latency,
            input_latency: self.input_latency,
            players_to_start: self.players_to_start,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let address = format!("{}:{}", args.host, args.port);

    let server = Server::bind(&address, args.game_config()).await?;

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    Ok(())
}
