/// Client-side tuning; world geometry comes from the server's `init`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub server_url: String,
    pub snapshot_capacity: usize,
    /// Seconds the rendered view trails the wall clock.
    pub interpolation_offset: f64,
    pub render_fps: u32,
    /// Input messages per second.
    pub input_rate: u32,
    /// Server-side artificial latency, shown in the HUD only.
    pub simulated_latency: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:8765".to_string(),
            snapshot_capacity: 40,
            interpolation_offset: 0.35,
            render_fps: 120,
            input_rate: 60,
            simulated_latency: 0.2,
        }
    }
}
