//! HTTP server for Tally.
//!
//! Thin glue between a game client and the score store: validates
//! submissions, appends them, and serves the ranked top-N.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use router::AppState;
pub use server::TallyServer;

/// HTTP endpoint paths.
pub mod endpoints {
    pub const HOME: &str = "/";
    pub const HEALTH: &str = "/health";
    pub const SCORES: &str = "/scores";
    pub const SUBMIT: &str = "/submit";
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use tally_store::{FileRecordStore, InMemoryRecordStore, RecordStore, StoreError, StoreResult};
    use tally_types::ScoreRecord;

    use super::*;

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl RecordStore for ReadOnlyStore {
        fn ensure_initialized(&self) -> StoreResult<()> {
            Ok(())
        }
        fn read_all(&self) -> Vec<ScoreRecord> {
            Vec::new()
        }
        fn append(&self, _record: ScoreRecord) -> StoreResult<()> {
            Err(StoreError::WriteFailure {
                path: "scores.json".into(),
                source: std::io::Error::other("read-only filesystem"),
            })
        }
        fn reset(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    fn app_with(store: Arc<dyn RecordStore>) -> Router {
        router::build_router(AppState::new(store, 10), true)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn submit(app: &Router, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(endpoints::SUBMIT)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn home_endpoint() {
        let app = app_with(Arc::new(InMemoryRecordStore::new()));
        let (status, body) = get(&app, endpoints::HOME).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = app_with(Arc::new(InMemoryRecordStore::new()));
        let (status, body) = get(&app, endpoints::HEALTH).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn scores_are_ranked_and_truncated() {
        let records = (0..15u64)
            .map(|i| ScoreRecord::new(format!("p{i}"), i))
            .collect();
        let app = app_with(Arc::new(InMemoryRecordStore::with_records(records)));

        let (status, body) = get(&app, endpoints::SCORES).await;
        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0], json!({ "name": "p14", "score": 14 }));
        assert_eq!(entries[9], json!({ "name": "p5", "score": 5 }));
    }

    #[tokio::test]
    async fn submit_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::open(dir.path().join("scores.json")).unwrap();
        let app = app_with(Arc::new(store));

        let (status, _) = submit(&app, json!({ "name": "  Lan ", "score": 12 })).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = submit(&app, json!({ "name": "Huy", "score": 30 })).await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = get(&app, endpoints::SCORES).await;
        assert_eq!(
            body,
            json!([{ "name": "Huy", "score": 30 }, { "name": "Lan", "score": 12 }])
        );
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let store = Arc::new(InMemoryRecordStore::new());
        let app = app_with(store.clone());

        let (status, body) = submit(&app, json!({ "name": "   ", "score": 3 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "name must not be empty");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn negative_score_is_rejected() {
        let store = Arc::new(InMemoryRecordStore::new());
        let app = app_with(store.clone());

        let (status, _) = submit(&app, json!({ "name": "Neg", "score": -1 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_unprocessable() {
        let app = app_with(Arc::new(InMemoryRecordStore::new()));
        let (status, _) = submit(&app, json!({ "name": "NoScore" })).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn write_failure_is_server_error() {
        let app = app_with(Arc::new(ReadOnlyStore));
        let (status, body) = submit(&app, json!({ "name": "Ann", "score": 1 })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("read-only filesystem"));
    }

    #[tokio::test]
    async fn permissive_cors_allows_any_origin() {
        let app = app_with(Arc::new(InMemoryRecordStore::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri(endpoints::SCORES)
                    .header(header::ORIGIN, "http://game.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
