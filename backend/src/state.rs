//! Shared application state injected into every handler as `web::Data`.

use crate::config::ServerConfig;
use crate::db::SqliteStore;

/// Explicitly constructed in `main` (or a test) and cloned into each worker.
#[derive(Clone)]
pub struct AppState {
    pub store: SqliteStore,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(store: SqliteStore, config: ServerConfig) -> Self {
        Self { store, config }
    }

    pub fn expose_errors(&self) -> bool {
        self.config.is_development()
    }
}
