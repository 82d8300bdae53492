// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use draftboard_core::JobStore;

use crate::config::ServerConfig;
use crate::engine::EngineClient;

/// Shared application state accessible from all route handlers.
///
/// The job store lives here, constructed once at process start — handlers
/// never reach for a global, so tests get fully isolated stores.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Process-wide job registry.
    pub store: Arc<JobStore>,
    /// Client for the external workflow engine.
    pub engine: EngineClient,
    pub config: ServerConfig,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(config: ServerConfig) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            store: Arc::new(JobStore::with_max_results(config.max_results_per_job)),
            engine: EngineClient::new(config.engine_url.clone()),
            config,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_new() {
        let state = AppState::new(ServerConfig::for_tests("http://engine.local/start"));
        assert!(state.uptime_secs() < 1);
        assert!(state.store.is_empty());
    }

    #[test]
    fn test_app_state_store_is_isolated_per_instance() {
        let a = AppState::new(ServerConfig::for_tests("http://engine.local/start"));
        let b = AppState::new(ServerConfig::for_tests("http://engine.local/start"));

        a.store.create_job("only-in-a").unwrap();
        assert!(a.store.get_job("only-in-a").is_some());
        assert!(b.store.get_job("only-in-a").is_none());
    }
}
