use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    /// Root of the PGN archive (player/date/file layout)
    pub games_dir: String,

    /// Path to the Stockfish binary
    pub stockfish_path: String,

    /// Search depth per /analyze_fen request
    pub search_depth: u32,

    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            games_dir: env::var("GAMES_DIR").unwrap_or_else(|_| "./games".to_string()),
            stockfish_path: env::var("STOCKFISH_PATH")
                .unwrap_or_else(|_| "/usr/games/stockfish".to_string()),
            search_depth: env::var("SEARCH_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        }
    }
}
