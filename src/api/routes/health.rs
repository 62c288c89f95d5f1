use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub message: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "hello world",
    })
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::{EngineConfig, TrackerConfig};
    use crate::engine::StatsService;
    use crate::fetch::MockStatSource;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn setup_test_state() -> AppState {
        AppState {
            stats: StatsService::new(
                Arc::new(MockStatSource::new()),
                EngineConfig::default(),
                "cs2",
            ),
            tracker: Arc::new(TrackerConfig::default()),
            cors_origin: "*".to_string(),
        }
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(setup_test_state());
        let (status, json) = get_json(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_hello() {
        let app = build_router(setup_test_state());
        let (status, json) = get_json(app, "/api/v1/hello").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "hello world");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = build_router(setup_test_state());
        let (status, _) = get_json(app, "/api/v2/hello").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_header_present() {
        let app = build_router(setup_test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/hello")
                    .header("origin", "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
