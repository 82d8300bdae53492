//! API route handlers for the draftboard server.

pub mod callback;
pub mod generate;
pub mod health;
pub mod jobs;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET  /api/health - Health check
/// - POST /api/generate - Start a generation job on the workflow engine
/// - POST /api/callback - Inbound results from the workflow engine
/// - GET  /api/jobs/{id} - Poll a job's current view
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", generate::router())
        .nest("/api", callback::router())
        .nest("/api", jobs::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    #[test]
    fn test_api_routes_creation() {
        let state = AppState::new(ServerConfig::for_tests("http://engine.local/start"));
        let _router = api_routes(state);
    }
}
