// crates/server/src/lib.rs
//! Draftboard server library.
//!
//! Axum HTTP surface over the in-memory job aggregator: a dashboard route
//! starts a generation job on the external workflow engine, the engine
//! reports results through the callback endpoint, and browsers poll the job
//! view until it turns terminal.

pub mod config;
pub mod engine;
pub mod error;
pub mod routes;
pub mod state;
pub mod sweep;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::api_routes;
pub use state::AppState;
pub use sweep::spawn_sweeper;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes (health, generate, callback, jobs)
/// - CORS for the dashboard frontend (allows any origin)
/// - Request tracing
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn test_app() -> Router {
        create_app(AppState::new(ServerConfig::for_tests(
            "http://engine.local/start",
        )))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = get(test_app(), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"status\":\"ok\""));
        assert!(body.contains("\"version\""));
        assert!(body.contains("\"uptime_secs\""));
    }

    #[tokio::test]
    async fn test_404_for_unknown_route() {
        let (status, _body) = get(test_app(), "/api/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_404_for_root_path() {
        let (status, _body) = get(test_app(), "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("Origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let allow_origin = response.headers().get("access-control-allow-origin");
        assert!(allow_origin.is_some());
        assert_eq!(allow_origin.unwrap(), "*");
    }

    #[tokio::test]
    async fn test_multiple_requests() {
        let app = test_app();

        let (status1, _) = get(app.clone(), "/api/health").await;
        assert_eq!(status1, StatusCode::OK);

        let (status2, _) = get(app, "/api/health").await;
        assert_eq!(status2, StatusCode::OK);
    }
}
