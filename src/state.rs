use std::sync::Arc;

use crate::config::Config;
use crate::domain::repositories::UserRepository;

/// Application state shared across all HTTP handlers
///
/// The record store is constructed once at startup and handed to every
/// handler through this state.
#[derive(Clone)]
pub struct AppState {
    /// Record store holding user documents
    pub users: Arc<dyn UserRepository>,
    /// Runtime configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self {
            users,
            config: Arc::new(config),
        }
    }
}
