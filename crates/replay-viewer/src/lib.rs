pub mod clients;
pub mod config;
pub mod controller;
pub mod error;
pub mod eval_tracker;
pub mod score;
pub mod session;
pub mod view;
