//! CORS policy built from `ServerConfig`.

use axum::http::{HeaderName, HeaderValue, Method, header};
use desk_config::ServerConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};

const API_KEY: HeaderName = HeaderName::from_static("api-key");

/// Credentialed CORS for the configured origins. Origins that are not valid
/// header values are skipped with a warning.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(%origin, %error, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            API_KEY,
        ])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(config.cors_max_age())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use desk_db::DeskDb;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;
    use crate::routes::router;
    use crate::state::AppState;

    async fn app(config: &ServerConfig) -> (tempfile::TempDir, axum::Router) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.db");
        let db = DeskDb::open_local(&path.to_string_lossy()).await.unwrap();
        let state = AppState::new(Arc::new(db), Duration::from_secs(5));
        (dir, router(state, cors_layer(config)))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/v1/tickets")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn allowed_origin_gets_cors_headers() {
        let config = ServerConfig::default();
        let (_dir, app) = app(&config).await;

        let response = app.oneshot(preflight("http://localhost:3000")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
        assert_eq!(headers.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "43200");
    }

    #[tokio::test]
    async fn unlisted_origin_gets_no_allow_origin() {
        let config = ServerConfig::default();
        let (_dir, app) = app(&config).await;

        let response = app.oneshot(preflight("http://evil.example")).await.unwrap();
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
