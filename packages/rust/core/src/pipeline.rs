//! Single-title enrichment: look up, fetch, summarize, persist.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use biosearch_fetcher::{ContentFetcher, HttpFetcher};
use biosearch_shared::{AppConfig, DocumentEntry, Result};
use biosearch_storage::Storage;
use biosearch_summarizer::{GeminiClient, Summarizer};

use crate::locks::TitleLocks;

/// Lazily enriches catalog entries on first access.
///
/// At most one enrichment runs per title at a time; callers that waited on
/// the lock observe the winner's write and return without refetching.
pub struct Enricher {
    storage: Arc<Storage>,
    fetcher: Arc<dyn ContentFetcher>,
    summarizer: Arc<dyn Summarizer>,
    locks: TitleLocks,
}

impl Enricher {
    pub fn new(
        storage: Arc<Storage>,
        fetcher: Arc<dyn ContentFetcher>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            storage,
            fetcher,
            summarizer,
            locks: TitleLocks::new(),
        }
    }

    /// Wire the HTTP fetcher and Gemini summarizer from config.
    pub fn from_config(storage: Arc<Storage>, config: &AppConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        let summarizer = GeminiClient::new(config.summarizer.clone())?;
        Ok(Self::new(storage, Arc::new(fetcher), Arc::new(summarizer)))
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    /// Return the entry for `title`, enriching it first if needed.
    ///
    /// Fails with `NotFound` for unknown titles. Fetch and summarizer
    /// failures propagate and leave the stored row untouched.
    #[instrument(skip(self))]
    pub async fn ensure_enriched(&self, title: &str) -> Result<DocumentEntry> {
        let entry = self.storage.get(title).await?;
        if entry.is_enriched() {
            debug!("already enriched");
            return Ok(entry);
        }

        let _guard = self.locks.acquire(title).await;

        // Another task may have finished while we waited.
        let entry = self.storage.get(title).await?;
        if entry.is_enriched() {
            debug!("enriched while waiting for lock");
            return Ok(entry);
        }

        info!(link = %entry.link, "enriching entry");
        let text = self.fetcher.fetch(&entry.link).await.inspect_err(|e| {
            warn!(link = %entry.link, kind = e.kind(), error = %e, "fetch failed");
        })?;

        let summary = self.summarizer.summarize(&text).await.inspect_err(|e| {
            warn!(kind = e.kind(), error = %e, "summarization failed");
        })?;

        self.storage.upsert_enrichment(title, &summary).await?;

        let entry = entry.with_summary(summary);
        if entry.is_enriched() {
            info!("entry enriched");
        } else {
            warn!("summary lacks description or tags; entry stays unenriched");
        }
        Ok(entry)
    }

    /// Whether `title` is enriched. `NotFound` for unknown titles.
    pub async fn is_indexed(&self, title: &str) -> Result<bool> {
        Ok(self.storage.get(title).await?.is_enriched())
    }
}
