//! Seldio Book Lending System
//!
//! A Rust implementation of the Seldio book lending server: an in-memory
//! catalog with borrow/return/rating transitions, a line-oriented file
//! persistence codec, a user directory, and a REST JSON API on top.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
