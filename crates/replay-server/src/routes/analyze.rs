use std::sync::Arc;

use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::AppError;

/// One engine process shared across requests; UCI is stateful, so
/// evaluations are serialized behind the lock.
pub type SharedEngine = Arc<Mutex<Engine>>;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub fen: String,
}

/// POST /analyze_fen — evaluate a position on the shared engine.
pub async fn analyze_fen(
    Extension(config): Extension<Config>,
    Extension(engine): Extension<SharedEngine>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<JsonValue>, AppError> {
    if req.fen.trim().is_empty() {
        return Err(AppError::BadRequest("Missing FEN".to_string()));
    }

    let eval = {
        let mut engine = engine.lock().await;
        engine.evaluate(&req.fen, config.search_depth).await?
    };

    Ok(Json(json!({
        "score": eval.score_json(),
        "best_move": eval.best_move,
    })))
}
