//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::SessionRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = Arc::new(SessionRegistry::new(config.max_sessions));

        Self {
            config: Arc::new(config),
            sessions,
        }
    }

    /// Seed for a new session's roster
    pub fn next_seed(&self) -> u64 {
        self.config.gallery_seed.unwrap_or_else(rand::random::<u64>)
    }
}
