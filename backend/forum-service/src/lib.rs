/// Forum Service Library
///
/// Serves the posts, comments and votes endpoints of the forum.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `models`: Users, posts, comments and vote state
/// - `services`: Business logic (post CRUD, vote toggling, comments)
/// - `repository`: Storage trait with PostgreSQL and in-memory backends
/// - `middleware`: Authorization predicates run after the token guard
/// - `error`: Error taxonomy rendered into the response envelope
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

use repository::ForumRepository;
use std::sync::Arc;

/// Shared application state handed to every handler through `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn ForumRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn ForumRepository>) -> Self {
        Self { repo }
    }
}
