//! reqwest-backed [`ContentFetcher`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Selector;
use tracing::{debug, instrument};
use url::Url;

use biosearch_shared::{BiosearchError, FetcherConfig, Result};

use crate::ContentFetcher;
use crate::extract::{extract_region_text, parse_selector};

/// Fetches catalog links over HTTP and extracts the configured content region.
pub struct HttpFetcher {
    client: Client,
    selector: Selector,
}

impl HttpFetcher {
    /// Build a fetcher from config. Fails on an unparsable selector.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BiosearchError::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            selector: parse_selector(&config.content_selector)?,
        })
    }

    /// Retrieve the raw page body.
    async fn fetch_html(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| BiosearchError::Fetch(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BiosearchError::Fetch(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| BiosearchError::Fetch(format!("{url}: body read failed: {e}")))
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, link: &str) -> Result<String> {
        let url =
            Url::parse(link).map_err(|e| BiosearchError::Fetch(format!("invalid link {link:?}: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(BiosearchError::Fetch(format!(
                "unsupported scheme in link {link:?}"
            )));
        }

        let html = self.fetch_html(&url).await?;
        let text = extract_region_text(&html, &self.selector)?;
        debug!(%url, chars = text.len(), "extracted content region");
        Ok(text)
    }
}
