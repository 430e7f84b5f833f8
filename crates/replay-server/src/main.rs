//! Replay backend
//!
//! Serves the PGN archive (/games, /load_game) and Stockfish position
//! evaluations (/analyze_fen) to the replay viewer.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use replay_server::config::Config;
use replay_server::engine::Engine;
use replay_server::routes;

#[tokio::main]
async fn main() {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();

    tracing::info!(path = %config.stockfish_path, "Starting engine...");
    let engine = Engine::spawn(&config.stockfish_path)
        .await
        .expect("Failed to start Stockfish");
    let engine = Arc::new(Mutex::new(engine));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/games", get(routes::games::list_games))
        .route("/load_game", post(routes::games::load_game))
        .route("/analyze_fen", post(routes::analyze::analyze_fen))
        .layer(Extension(config.clone()))
        .layer(Extension(engine))
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}
