//! Page retrieval and main-text extraction for catalog links.
//!
//! This crate provides:
//! - [`ContentFetcher`]: the seam the enrichment pipeline calls
//! - [`HttpFetcher`]: reqwest-backed implementation with a browser-like User-Agent
//! - [`extract`]: pulls the article body text out of fetched HTML

pub mod client;
pub mod extract;

use async_trait::async_trait;
use biosearch_shared::Result;

pub use client::HttpFetcher;
pub use extract::{extract_region_text, parse_selector};

/// Retrieves a link and returns the text of its main content region.
///
/// Transport failures surface as `Fetch`, a missing content region as
/// `Extraction`. Implementations never cache.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, link: &str) -> Result<String>;
}
