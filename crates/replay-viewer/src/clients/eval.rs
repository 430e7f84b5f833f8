//! Position-evaluation service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;
use crate::score::Score;

/// Result of evaluating a single position.
#[derive(Debug, Clone, Deserialize)]
pub struct Evaluation {
    pub score: Score,
    pub best_move: Option<String>,
}

/// Remote analysis service, queried with one FEN per request.
#[async_trait]
pub trait EvalService: Send + Sync {
    async fn evaluate(&self, fen: &str) -> Result<Evaluation, ViewerError>;
}

/// Client for the backend's POST /analyze_fen endpoint.
#[derive(Clone)]
pub struct HttpEvalClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    fen: &'a str,
}

/// The endpoint reports failures in-band as `{"error": "..."}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnalyzeResponse {
    Error { error: String },
    Evaluation(Evaluation),
}

impl HttpEvalClient {
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
impl EvalService for HttpEvalClient {
    async fn evaluate(&self, fen: &str) -> Result<Evaluation, ViewerError> {
        let resp = self
            .client
            .post(format!("{}/analyze_fen", self.base_url))
            .json(&AnalyzeRequest { fen })
            .send()
            .await?;

        let status = resp.status();
        let body: AnalyzeResponse = match resp.json().await {
            Ok(body) => body,
            Err(_) => return Err(ViewerError::Evaluation(format!("HTTP {status}"))),
        };

        match body {
            AnalyzeResponse::Error { error } => Err(ViewerError::Evaluation(error)),
            AnalyzeResponse::Evaluation(eval) => Ok(eval),
        }
    }
}
