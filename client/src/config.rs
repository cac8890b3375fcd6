use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3005";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    /// Period of the newest-page poll.
    pub poll_interval: Duration,
    /// Capacity of the command queue into the client task.
    pub command_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            command_buffer: 32,
        }
    }
}
