//! Terminal replay driver
//!
//! Loads a recorded game from the local PGN archive and auto-steps through
//! it, printing the board position, capture trays, and evaluation info for
//! every ply. Evaluations come from the replay backend's /analyze_fen
//! endpoint.

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use replay_viewer::clients::{FileRecordStore, HttpEvalClient};
use replay_viewer::config::ViewerConfig;
use replay_viewer::session::ReplaySession;
use replay_viewer::view::TextView;

/// Expects: replay-viewer <player> <date> <file.pgn>
fn parse_args() -> Option<(String, String, String)> {
    let mut args = std::env::args().skip(1);
    let player = args.next()?;
    let date = args.next()?;
    let file = args.next()?;
    Some((player, date, file))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ViewerConfig::from_env();
    let (player, date, file) = parse_args()
        .ok_or_else(|| anyhow::anyhow!("usage: replay-viewer <player> <date> <file.pgn>"))?;

    let records = FileRecordStore::new(&config.games_dir);
    let eval = HttpEvalClient::new(&config.server_url, config.http_timeout);
    let session = ReplaySession::new(TextView, records, eval);

    session.load_game(&player, &date, &file).await;

    let total = {
        let controller = session.controller();
        let guard = controller.lock().await;
        guard.record().moves.len()
    };

    for _ in 0..total {
        tokio::time::sleep(Duration::from_millis(config.step_delay_ms)).await;
        session.next_move().await?;
    }

    // Let the last evaluation response land before exiting.
    tokio::time::sleep(Duration::from_millis(config.step_delay_ms)).await;

    Ok(())
}
