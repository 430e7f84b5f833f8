//! Viewer configuration from environment variables

use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// Root of the local PGN archive (player/date/file layout)
    pub games_dir: String,

    /// Base URL of the replay backend (record loading and evaluation)
    pub server_url: String,

    /// Timeout applied to HTTP collaborator requests
    pub http_timeout: Duration,

    /// Pause between plies when auto-stepping through a game
    pub step_delay_ms: u64,
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        Self {
            games_dir: env::var("GAMES_DIR").unwrap_or_else(|_| "./games".to_string()),
            server_url: env::var("SERVER_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            http_timeout: Duration::from_secs(
                env::var("HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            step_delay_ms: env::var("STEP_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(400),
        }
    }
}
