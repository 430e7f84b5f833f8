//! Viewer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("{0}")]
    Record(String),

    #[error("{0}")]
    Evaluation(String),

    #[error("Illegal move at ply {ply}: {san}")]
    IllegalMove { ply: usize, san: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
