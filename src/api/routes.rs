//! API Routes
//!
//! Configures the Axum router for the proxy.

use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{proxy_handler, AppState};

/// Creates the main router.
///
/// The proxy handler is the fallback, so it matches every path and every
/// method; the method is not forwarded and upstream always sees a GET.
///
/// # Middleware
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(proxy_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::upstream::Upstream;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    /// Base URL of a port nothing listens on.
    fn refused_upstream() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn create_test_app(dir: &TempDir) -> (Router, AppState) {
        let cache = CacheStore::open(dir.path(), 1).unwrap();
        let state = AppState::new(cache, Upstream::new(refused_upstream()));
        (create_router(state.clone()), state)
    }

    async fn body_bytes(body: Body) -> Vec<u8> {
        axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn test_cached_entry_served_without_upstream() {
        let dir = TempDir::new().unwrap();
        let (app, state) = create_test_app(&dir);
        state.cache.save("/items/42", br#"{"id":42}"#).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/items/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_bytes(response.into_body()).await, br#"{"id":42}"#);
    }

    #[tokio::test]
    async fn test_any_method_hits_the_proxy() {
        let dir = TempDir::new().unwrap();
        let (app, state) = create_test_app(&dir);
        state.cache.save("/things?page=2", b"[1,2]").await;

        for method in ["POST", "DELETE", "PUT"] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri("/things?page=2")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_bytes(response.into_body()).await, b"[1,2]");
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_returns_error_payload_with_200() {
        let dir = TempDir::new().unwrap();
        let (app, state) = create_test_app(&dir);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/items/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let json: Value = serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
        assert_eq!(json["error"]["code"], "internal");
        let message = json["error"]["message"].as_str().unwrap();
        assert!(message.starts_with("Request error: "));

        // Errors are never cached.
        assert!(!state.cache.path_for("/items/42").exists());
    }
}
