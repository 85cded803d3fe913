//! HTTP serving surface for the document catalog.
//!
//! - `GET /titles` lists every title
//! - `GET /entry?title=` returns an entry, enriching it on first access
//! - `GET /is_indexed?title=` reports whether an entry is enriched

mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;

use std::sync::Arc;

use biosearch_core::Enricher;
use biosearch_shared::{BiosearchError, Result};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub enricher: Arc<Enricher>,
}

impl AppState {
    pub fn new(enricher: Arc<Enricher>) -> Self {
        Self { enricher }
    }
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| BiosearchError::config(format!("cannot bind {host}:{port}: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| BiosearchError::config(e.to_string()))?;
    tracing::info!("Starting server at http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| BiosearchError::config(format!("server error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use biosearch_fetcher::ContentFetcher;
    use biosearch_shared::{DocumentEntry, Summary};
    use biosearch_storage::Storage;
    use biosearch_summarizer::Summarizer;
    use tower::ServiceExt;
    use uuid::Uuid;

    struct StaticFetcher {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ContentFetcher for StaticFetcher {
        async fn fetch(&self, link: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if link.contains("broken") {
                return Err(BiosearchError::extraction("content container not found in the page"));
            }
            if link.contains("nokey") {
                return Ok("NOKEY".into());
            }
            Ok("Mice were flown on the ISS.".into())
        }
    }

    struct StaticSummarizer;

    #[async_trait]
    impl Summarizer for StaticSummarizer {
        async fn summarize(&self, text: &str) -> Result<Summary> {
            if text == "NOKEY" {
                return Err(BiosearchError::missing_credential("GEMINI_API_KEY"));
            }
            Ok(Summary {
                description: Some("D".into()),
                tags: Some(vec!["x".into(), "y".into()]),
                authors: Some(vec!["Z".into()]),
                doc_type: Some("experimental".into()),
            })
        }
    }

    async fn setup_test_app() -> (Router, Arc<AtomicUsize>) {
        let (app, calls, _) = setup_test_app_with_storage().await;
        (app, calls)
    }

    async fn setup_test_app_with_storage() -> (Router, Arc<AtomicUsize>, Arc<Storage>) {
        let tmp = std::env::temp_dir().join(format!("bs_server_{}.db", Uuid::now_v7()));
        let storage = Storage::open(&tmp).await.expect("open test db");
        storage
            .bulk_insert(&[
                DocumentEntry::new("Paper A", "https://u"),
                DocumentEntry::new("Paper B", "https://broken"),
                DocumentEntry::new("Paper C", "https://nokey"),
            ])
            .await
            .expect("seed");
        let storage = Arc::new(storage);

        let calls = Arc::new(AtomicUsize::new(0));
        let enricher = Enricher::new(
            storage.clone(),
            Arc::new(StaticFetcher {
                calls: calls.clone(),
            }),
            Arc::new(StaticSummarizer),
        );
        (create_router(AppState::new(Arc::new(enricher))), calls, storage)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = setup_test_app().await;
        let (status, _) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_titles() {
        let (app, _) = setup_test_app().await;
        let (status, json) = get(&app, "/titles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!(["Paper A", "Paper B", "Paper C"]));

        let (_, alias) = get(&app, "/get_titles").await;
        assert_eq!(alias, json);
    }

    #[tokio::test]
    async fn test_entry_enriches_once() {
        let (app, calls) = setup_test_app().await;

        let (status, _) = get(&app, "/is_indexed?title=Paper%20A").await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = get(&app, "/entry?title=Paper%20A").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["Title"], "Paper A");
        assert_eq!(json["Link"], "https://u");
        assert_eq!(json["description"], "D");
        assert_eq!(json["tags"], serde_json::json!(["x", "y"]));
        assert_eq!(json["authors"], serde_json::json!(["Z"]));
        assert_eq!(json["doc_type"], "experimental");

        let (_, again) = get(&app, "/get_dataset_data?title=Paper%20A").await;
        assert_eq!(again, json);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let (_, indexed) = get(&app, "/is_indexed?title=Paper%20A").await;
        assert_eq!(indexed, serde_json::json!({ "indexed": true }));
    }

    #[tokio::test]
    async fn test_is_indexed_false_before_access() {
        let (app, _) = setup_test_app().await;
        let (_, json) = get(&app, "/is_indexed?title=Paper%20A").await;
        assert_eq!(json, serde_json::json!({ "indexed": false }));
    }

    #[tokio::test]
    async fn test_unknown_title_is_404() {
        let (app, _) = setup_test_app().await;

        let (status, json) = get(&app, "/entry?title=nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["kind"], "not_found");

        let (status, _) = get(&app, "/is_indexed?title=nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_extraction_failure_is_502() {
        let (app, _) = setup_test_app().await;
        let (status, json) = get(&app, "/entry?title=Paper%20B").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["kind"], "extraction_error");
        assert!(json["detail"].as_str().unwrap().contains("content container"));
    }

    #[tokio::test]
    async fn test_missing_credential_is_500_and_row_unchanged() {
        let (app, _, storage) = setup_test_app_with_storage().await;

        let (status, json) = get(&app, "/entry?title=Paper%20C").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["kind"], "missing_credential");
        assert!(json["detail"].as_str().unwrap().contains("GEMINI_API_KEY"));

        assert_eq!(
            storage.get("Paper C").await.unwrap(),
            DocumentEntry::new("Paper C", "https://nokey")
        );
        let (_, indexed) = get(&app, "/is_indexed?title=Paper%20C").await;
        assert_eq!(indexed, serde_json::json!({ "indexed": false }));
    }

    #[tokio::test]
    async fn test_missing_title_param_is_400() {
        let (app, _) = setup_test_app().await;
        let (status, _) = get(&app, "/entry").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get(&app, "/is_indexed").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
