//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::chat::{Dispatcher, SessionStore};

use super::config::ServerConfig;

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// Stateless reply engine.
    pub dispatcher: Dispatcher,
    /// Live session shells.
    pub sessions: SessionStore,
    /// Settings the server was started with.
    pub config: ServerConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let sessions = SessionStore::new(config.max_sessions, config.greeting.clone());
        Arc::new(Self {
            dispatcher: Dispatcher::new(),
            sessions,
            config,
        })
    }
}
