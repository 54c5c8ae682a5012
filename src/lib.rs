//! Fleet Server
//!
//! REST JSON API for a tanker-truck fleet: vehicles, trailers and their
//! assignments, maintenance and compliance documents, inspection checklists
//! with PDF reports, and a fleet-wide status dashboard.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod repository;
pub mod services;
pub mod status;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
