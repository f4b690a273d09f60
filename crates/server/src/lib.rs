// crates/server/src/lib.rs
//! Phasewire server library.
//!
//! This crate provides the Axum-based HTTP server for phasewire. It serves a
//! REST API for project and phase lifecycle operations plus a per-project SSE
//! stream that pushes every committed phase change to connected viewers.

pub mod error;
pub mod feed;
pub mod routes;
pub mod state;
pub mod viewer;

pub use error::*;
pub use feed::PhaseFeed;
pub use routes::api_routes;
pub use state::AppState;
pub use viewer::PhaseViewer;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes (health, projects, phases, SSE stream)
/// - CORS for development (allows any origin)
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

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let db = phasewire_db::Database::new_in_memory()
            .await
            .expect("in-memory DB");
        create_app(AppState::new(db))
    }

    /// Helper to make a GET request to the app.
    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = test_app().await;
        let (status, body) = get(app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"status\":\"ok\""));
        assert!(body.contains("\"version\""));
        assert!(body.contains("\"uptime_secs\""));
        assert!(body.contains("\"store\":\"memory\""));
        assert!(body.contains("\"live_viewers\":0"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = test_app().await;
        let (status, _) = get(app, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_phases_of_unknown_project_is_404() {
        let app = test_app().await;
        let (status, body) = get(app, "/api/projects/missing/phases").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json.get("error").is_some(), "expected error field in response");
    }

    #[tokio::test]
    async fn test_stream_of_unknown_project_is_404() {
        let app = test_app().await;
        let (status, _) = get(app, "/api/projects/missing/phases/stream").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_project_listing_requires_a_tenant_filter() {
        let app = test_app().await;
        let (status, _) = get(app, "/api/projects").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("Origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
