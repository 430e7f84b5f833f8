//! Stockfish wrapper for single-position evaluation over UCI (async I/O)

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use crate::error::AppError;

/// Evaluation of one position at a fixed depth.
#[derive(Debug, Clone)]
pub struct EngineEval {
    /// Score in pawn units (centipawns / 100), positive favoring White
    /// from the engine's reported perspective
    pub pawns: Option<f64>,
    /// Forced mate in N; sign indicates the losing side
    pub mate: Option<i32>,
    /// Best move in UCI notation, if the engine found one
    pub best_move: Option<String>,
}

impl EngineEval {
    /// Build from raw UCI values. The engine reports `cp`/`mate` from the
    /// side-to-move's perspective; the viewer expects white-positive, so
    /// both are negated when Black is on move.
    pub fn from_uci(
        cp: Option<i32>,
        mate: Option<i32>,
        best_move: Option<String>,
        black_to_move: bool,
    ) -> Self {
        let sign = if black_to_move { -1 } else { 1 };
        Self {
            pawns: cp.map(|cp| (sign * cp) as f64 / 100.0),
            mate: mate.map(|n| sign * n),
            best_move,
        }
    }

    /// Score in the wire shape the viewer expects: a pawn-unit number,
    /// or "mate N" when a forced mate was found.
    pub fn score_json(&self) -> serde_json::Value {
        if let Some(mate) = self.mate {
            serde_json::Value::String(format!("mate {mate}"))
        } else if let Some(pawns) = self.pawns {
            serde_json::json!(pawns)
        } else {
            serde_json::Value::Null
        }
    }
}

/// A single long-lived Stockfish process.
pub struct Engine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Engine {
    /// Spawn the engine process and run the UCI handshake.
    pub async fn spawn(path: &str) -> Result<Self, AppError> {
        let mut process = Command::new(path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| AppError::Engine(format!("Failed to spawn {path}: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| AppError::Engine("No stdin handle".to_string()))?;
        let stdout = BufReader::new(
            process
                .stdout
                .take()
                .ok_or_else(|| AppError::Engine("No stdout handle".to_string()))?,
        );

        let mut engine = Self {
            process,
            stdin,
            stdout,
        };

        engine.send("uci").await?;
        engine.wait_for("uciok").await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    async fn send(&mut self, cmd: &str) -> Result<(), AppError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| AppError::Engine(format!("Failed to write to engine: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| AppError::Engine(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    async fn read_line(&mut self, line: &mut String) -> Result<usize, AppError> {
        line.clear();
        self.stdout
            .read_line(line)
            .await
            .map_err(|e| AppError::Engine(format!("Failed to read from engine: {e}")))
    }

    async fn wait_for(&mut self, expected: &str) -> Result<(), AppError> {
        let mut line = String::new();
        loop {
            if self.read_line(&mut line).await? == 0 {
                return Err(AppError::Engine("Engine closed its pipe".to_string()));
            }
            let trimmed = line.trim();
            debug!(line = trimmed, "SF >");
            if trimmed == expected {
                return Ok(());
            }
        }
    }

    /// Evaluate a position at the given depth, returning the score from
    /// the final info line and the engine's best move.
    pub async fn evaluate(&mut self, fen: &str, depth: u32) -> Result<EngineEval, AppError> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go depth {depth}")).await?;

        let mut cp = None;
        let mut mate = None;
        let mut best_move = None;

        let mut line = String::new();
        loop {
            if self.read_line(&mut line).await? == 0 {
                return Err(AppError::Engine("Engine closed its pipe".to_string()));
            }
            let trimmed = line.trim();

            if trimmed.starts_with("info") && trimmed.contains("score") {
                if let Some(value) = field_after(trimmed, "cp") {
                    cp = Some(value);
                    mate = None;
                }
                if let Some(value) = field_after(trimmed, "mate") {
                    mate = Some(value);
                    cp = None;
                }
            } else if trimmed.starts_with("bestmove") {
                best_move = trimmed
                    .split_whitespace()
                    .nth(1)
                    .filter(|mv| *mv != "(none)")
                    .map(str::to_string);
                break;
            }
        }

        Ok(EngineEval::from_uci(cp, mate, best_move, black_to_move(fen)))
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

/// Second FEN field is the side to move.
fn black_to_move(fen: &str) -> bool {
    fen.split_whitespace().nth(1) == Some("b")
}

/// Integer field following a keyword in a UCI info line.
fn field_after(line: &str, key: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == key && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_after() {
        let line = "info depth 15 seldepth 21 score cp -34 nodes 420000 pv e7e5";
        assert_eq!(field_after(line, "cp"), Some(-34));
        assert_eq!(field_after(line, "mate"), None);

        let line = "info depth 15 score mate -3 pv h7h8q";
        assert_eq!(field_after(line, "mate"), Some(-3));
    }

    #[test]
    fn test_black_to_move() {
        assert!(!black_to_move(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        ));
        assert!(black_to_move(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        ));
    }

    #[test]
    fn test_from_uci_normalizes_to_white_perspective() {
        // White to move: values pass through unchanged.
        let eval = EngineEval::from_uci(Some(35), None, None, false);
        assert_eq!(eval.pawns, Some(0.35));

        // Black to move reporting -34 means Black is worse: White +0.34.
        let eval = EngineEval::from_uci(Some(-34), None, None, true);
        assert_eq!(eval.pawns, Some(0.34));

        // Mate for the mover with Black on move is a mate against White.
        let eval = EngineEval::from_uci(None, Some(3), None, true);
        assert_eq!(eval.mate, Some(-3));
        assert_eq!(eval.score_json(), serde_json::json!("mate -3"));
    }

    #[test]
    fn test_score_json_shapes() {
        let eval = EngineEval {
            pawns: Some(0.35),
            mate: None,
            best_move: Some("e2e4".to_string()),
        };
        assert_eq!(eval.score_json(), serde_json::json!(0.35));

        let eval = EngineEval {
            pawns: None,
            mate: Some(-2),
            best_move: None,
        };
        assert_eq!(eval.score_json(), serde_json::json!("mate -2"));
    }
}
