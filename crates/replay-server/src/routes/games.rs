use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use replay_core::pgn;

use crate::config::Config;
use crate::error::AppError;

/// GET /games — browse the PGN archive: player -> date -> filenames.
pub async fn list_games(
    Extension(config): Extension<Config>,
) -> Result<Json<JsonValue>, AppError> {
    let mut players: BTreeMap<String, BTreeMap<String, Vec<String>>> = BTreeMap::new();

    let root = Path::new(&config.games_dir);
    for player_entry in read_dirs(root) {
        let player_name = dir_name(&player_entry);
        let mut dates = BTreeMap::new();
        for date_entry in read_dirs(&player_entry) {
            let mut files: Vec<String> = std::fs::read_dir(&date_entry)
                .into_iter()
                .flatten()
                .flatten()
                .filter(|e| e.path().is_file())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .filter(|name| name.ends_with(".pgn"))
                .collect();
            files.sort();
            dates.insert(dir_name(&date_entry), files);
        }
        players.insert(player_name, dates);
    }

    Ok(Json(json!({ "players": players })))
}

fn read_dirs(path: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(path)
        .into_iter()
        .flatten()
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect()
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[derive(Deserialize)]
pub struct LoadGameRequest {
    pub player: String,
    pub date: String,
    pub filename: String,
}

/// POST /load_game — read a stored PGN and return the replayable record
/// (moves with per-ply FENs, player names, opening metadata).
pub async fn load_game(
    Extension(config): Extension<Config>,
    Json(req): Json<LoadGameRequest>,
) -> Result<Json<JsonValue>, AppError> {
    let path = safe_join(
        Path::new(&config.games_dir),
        &[&req.player, &req.date, &req.filename],
    )?;

    if !path.exists() {
        return Err(AppError::NotFound("Game not found".to_string()));
    }

    let pgn_text = std::fs::read_to_string(&path)
        .map_err(|e| AppError::Internal(format!("Failed to read game file: {e}")))?;

    let record = pgn::parse_pgn(&pgn_text)
        .ok_or_else(|| AppError::BadRequest("Could not parse PGN".to_string()))?;

    serde_json::to_value(&record)
        .map(Json)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Join request-supplied components under the base directory, rejecting
/// anything that could escape it.
fn safe_join(base: &Path, parts: &[&str]) -> Result<PathBuf, AppError> {
    let mut path = base.to_path_buf();
    for part in parts {
        if part.is_empty() || part.contains("..") || part.contains('/') || part.contains('\\') {
            return Err(AppError::BadRequest("Invalid file path".to_string()));
        }
        path.push(part);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_join_rejects_escapes() {
        let base = Path::new("/srv/games");
        assert!(safe_join(base, &["..", "x", "y.pgn"]).is_err());
        assert!(safe_join(base, &["alice", "../../etc", "passwd"]).is_err());
        assert!(safe_join(base, &["alice", "2026-08-01", "a/b.pgn"]).is_err());
        assert!(safe_join(base, &["alice", "2026-08-01", ""]).is_err());
    }

    #[test]
    fn test_safe_join_plain_components() {
        let base = Path::new("/srv/games");
        let path = safe_join(base, &["alice", "2026-08-01", "game1.pgn"]).unwrap();
        assert_eq!(path, PathBuf::from("/srv/games/alice/2026-08-01/game1.pgn"));
    }
}
