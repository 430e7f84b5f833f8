//! Game-record sources: the local PGN archive and the backend's
//! `/load_game` endpoint.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use replay_core::pgn;
use replay_core::record::GameRecord;

use crate::error::ViewerError;

/// Source of recorded games, keyed by player/date/filename.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn load(
        &self,
        player: &str,
        date: &str,
        filename: &str,
    ) -> Result<GameRecord, ViewerError>;
}

/// Reads PGN files from a `<games_dir>/<player>/<date>/<file>` layout.
pub struct FileRecordStore {
    games_dir: PathBuf,
}

impl FileRecordStore {
    pub fn new(games_dir: impl Into<PathBuf>) -> Self {
        Self {
            games_dir: games_dir.into(),
        }
    }

    /// Join the identifiers under the games dir, rejecting anything that
    /// could escape it.
    fn resolve(&self, player: &str, date: &str, filename: &str) -> Result<PathBuf, ViewerError> {
        for part in [player, date, filename] {
            if part.is_empty() || part.contains("..") || part.contains('/') || part.contains('\\')
            {
                return Err(ViewerError::Record("Invalid file path".to_string()));
            }
        }
        Ok(self.games_dir.join(player).join(date).join(filename))
    }
}

#[async_trait]
impl RecordSource for FileRecordStore {
    async fn load(
        &self,
        player: &str,
        date: &str,
        filename: &str,
    ) -> Result<GameRecord, ViewerError> {
        let path = self.resolve(player, date, filename)?;
        let pgn_text = tokio::fs::read_to_string(&path).await.map_err(|_| {
            ViewerError::Record(format!("Game not found: {player}/{date}/{filename}"))
        })?;
        pgn::parse_pgn(&pgn_text)
            .ok_or_else(|| ViewerError::Record(format!("Could not parse PGN: {filename}")))
    }
}

/// Client for the backend's POST /load_game endpoint.
#[derive(Clone)]
pub struct HttpRecordClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct LoadGameRequest<'a> {
    player: &'a str,
    date: &'a str,
    filename: &'a str,
}

/// The endpoint reports failures in-band as `{"error": "..."}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LoadGameResponse {
    Error { error: String },
    Record(GameRecord),
}

impl HttpRecordClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent("ReplayViewer/1.0")
            .timeout(timeout)
            .build()
            .unwrap();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RecordSource for HttpRecordClient {
    async fn load(
        &self,
        player: &str,
        date: &str,
        filename: &str,
    ) -> Result<GameRecord, ViewerError> {
        let resp = self
            .client
            .post(format!("{}/load_game", self.base_url))
            .json(&LoadGameRequest {
                player,
                date,
                filename,
            })
            .send()
            .await?;

        let status = resp.status();
        let body: LoadGameResponse = match resp.json().await {
            Ok(body) => body,
            Err(_) => return Err(ViewerError::Record(format!("HTTP {status}"))),
        };

        match body {
            LoadGameResponse::Error { error } => Err(ViewerError::Record(error)),
            LoadGameResponse::Record(record) => Ok(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = FileRecordStore::new("/srv/games");
        assert!(store.resolve("..", "2026-08-01", "a.pgn").is_err());
        assert!(store.resolve("alice", "../etc", "a.pgn").is_err());
        assert!(store.resolve("alice", "2026-08-01", "../../passwd").is_err());
        assert!(store.resolve("alice", "2026-08-01", "sub/dir.pgn").is_err());
        assert!(store.resolve("", "2026-08-01", "a.pgn").is_err());
    }

    #[test]
    fn test_resolve_joins_plain_components() {
        let store = FileRecordStore::new("/srv/games");
        let path = store.resolve("alice", "2026-08-01", "game1.pgn").unwrap();
        assert_eq!(path, PathBuf::from("/srv/games/alice/2026-08-01/game1.pgn"));
    }

    #[test]
    fn test_load_response_shapes() {
        let err: LoadGameResponse =
            serde_json::from_str(r#"{"error": "Game not found"}"#).unwrap();
        assert!(matches!(err, LoadGameResponse::Error { .. }));

        let ok: LoadGameResponse = serde_json::from_str(
            r#"{"moves": [{"move": "e4", "fen": null}], "white": "alice", "black": null, "opening": null}"#,
        )
        .unwrap();
        match ok {
            LoadGameResponse::Record(record) => {
                assert_eq!(record.moves.len(), 1);
                assert_eq!(record.white.as_deref(), Some("alice"));
            }
            LoadGameResponse::Error { .. } => panic!("expected a record"),
        }
    }
}
