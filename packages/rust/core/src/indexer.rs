//! Batch re-indexing of every unenriched catalog entry.
//!
//! The driver is sequential: one title at a time, with a fixed pause before
//! each call. A failure is recorded and the run moves on; there are no
//! retries and no second pass.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{info, instrument, warn};
use url::Url;

use biosearch_shared::{BiosearchError, IndexerConfig, Result};
use biosearch_storage::Storage;

use crate::pipeline::Enricher;

/// Anything that can bring a single title to the enriched state.
#[async_trait]
pub trait EntryEnricher: Send + Sync {
    async fn enrich(&self, title: &str) -> Result<()>;
}

#[async_trait]
impl EntryEnricher for Enricher {
    async fn enrich(&self, title: &str) -> Result<()> {
        self.ensure_enriched(title).await.map(|_| ())
    }
}

/// Drives enrichment through a running server's `/entry` route.
pub struct HttpEnricher {
    client: Client,
    entry_url: Url,
}

impl HttpEnricher {
    /// `base_url` is the server root, e.g. `http://localhost:8301`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| BiosearchError::config(format!("invalid indexer base_url {base_url:?}: {e}")))?;
        let entry_url = base
            .join("entry")
            .map_err(|e| BiosearchError::config(format!("invalid indexer base_url {base_url:?}: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BiosearchError::Fetch(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, entry_url })
    }

    pub fn from_config(config: &IndexerConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait]
impl EntryEnricher for HttpEnricher {
    async fn enrich(&self, title: &str) -> Result<()> {
        let response = self
            .client
            .get(self.entry_url.clone())
            .query(&[("title", title)])
            .send()
            .await
            .map_err(|e| BiosearchError::Fetch(format!("{}: {e}", self.entry_url)))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(BiosearchError::not_found(title)),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(BiosearchError::Fetch(format!("HTTP {status}: {body}")))
            }
        }
    }
}

/// Per-title progress callbacks for a reindex run.
pub trait IndexProgress: Send + Sync {
    fn started(&self, total: usize);
    fn indexed(&self, title: &str);
    fn failed(&self, title: &str, error: &BiosearchError);
    fn finished(&self, report: &IndexReport);
}

/// No-op progress for tests and quiet runs.
pub struct SilentIndexProgress;

impl IndexProgress for SilentIndexProgress {
    fn started(&self, _total: usize) {}
    fn indexed(&self, _title: &str) {}
    fn failed(&self, _title: &str, _error: &BiosearchError) {}
    fn finished(&self, _report: &IndexReport) {}
}

/// Outcome of a reindex run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub total: usize,
    pub succeeded: usize,
    /// `(title, error message)` for every title that failed.
    pub failed: Vec<(String, String)>,
}

/// Enrich every title the store lists as unenriched, in order.
///
/// Only a failure to list titles aborts the run.
#[instrument(skip_all, fields(pacing_ms = pacing.as_millis() as u64))]
pub async fn reindex_all(
    storage: &Storage,
    enricher: &dyn EntryEnricher,
    pacing: Duration,
    progress: &dyn IndexProgress,
) -> Result<IndexReport> {
    let titles = storage.list_unenriched().await?;
    info!(count = titles.len(), "found unindexed titles");
    progress.started(titles.len());

    let mut report = IndexReport {
        total: titles.len(),
        ..IndexReport::default()
    };

    for title in titles {
        tokio::time::sleep(pacing).await;
        match enricher.enrich(&title).await {
            Ok(()) => {
                info!(%title, "indexed");
                report.succeeded += 1;
                progress.indexed(&title);
            }
            Err(e) => {
                warn!(%title, kind = e.kind(), error = %e, "indexing failed");
                progress.failed(&title, &e);
                report.failed.push((title, e.to_string()));
            }
        }
    }

    info!(
        succeeded = report.succeeded,
        failed = report.failed.len(),
        "indexing complete"
    );
    progress.finished(&report);
    Ok(report)
}
