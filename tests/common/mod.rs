//! Shared test doubles for the replay session tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use replay_core::record::GameRecord;
use replay_viewer::clients::{EvalService, Evaluation, RecordSource};
use replay_viewer::error::ViewerError;
use replay_viewer::score::Score;

/// In-memory record source keyed by "player/date/filename".
pub struct StaticRecords {
    games: HashMap<String, GameRecord>,
}

impl StaticRecords {
    pub fn new() -> Self {
        Self {
            games: HashMap::new(),
        }
    }

    pub fn with_game(mut self, key: &str, record: GameRecord) -> Self {
        self.games.insert(key.to_string(), record);
        self
    }
}

#[async_trait]
impl RecordSource for StaticRecords {
    async fn load(
        &self,
        player: &str,
        date: &str,
        filename: &str,
    ) -> Result<GameRecord, ViewerError> {
        self.games
            .get(&format!("{player}/{date}/{filename}"))
            .cloned()
            .ok_or_else(|| ViewerError::Record("Game not found".to_string()))
    }
}

/// Scripted response for one evaluation request.
pub enum Scripted {
    Ok(Score),
    Error(&'static str),
    /// Delay before answering, to simulate a slow engine.
    SlowOk(Score, Duration),
}

/// Evaluation service that answers from a fixed script, in request order.
pub struct ScriptedEval {
    responses: Mutex<VecDeque<Scripted>>,
}

impl ScriptedEval {
    pub fn new(responses: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
        }
    }
}

#[async_trait]
impl EvalService for ScriptedEval {
    async fn evaluate(&self, _fen: &str) -> Result<Evaluation, ViewerError> {
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Ok(score)) => Ok(Evaluation {
                score,
                best_move: Some("e2e4".to_string()),
            }),
            Some(Scripted::SlowOk(score, delay)) => {
                tokio::time::sleep(delay).await;
                Ok(Evaluation {
                    score,
                    best_move: Some("e2e4".to_string()),
                })
            }
            Some(Scripted::Error(msg)) => Err(ViewerError::Evaluation(msg.to_string())),
            None => Err(ViewerError::Evaluation("no scripted response".to_string())),
        }
    }
}

/// Let spawned evaluation tasks run to completion.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}
