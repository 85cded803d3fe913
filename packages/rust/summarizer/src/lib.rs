//! Summarizer client: turns extracted page text into structured catalog metadata.
//!
//! This crate provides:
//! - [`Summarizer`]: the seam the enrichment pipeline calls
//! - [`GeminiClient`]: Gemini `generateContent` implementation
//! - [`prompt`]: instruction construction
//! - [`payload`]: JSON payload extraction from model text

pub mod gemini;
pub mod payload;
pub mod prompt;

use async_trait::async_trait;
use biosearch_shared::{Result, Summary};

pub use gemini::GeminiClient;
pub use payload::{extract_json_payload, parse_summary};
pub use prompt::build_prompt;

/// Produces description, tags, authors and document type for a text.
///
/// Fails with `MissingCredential`, `Summarizer` (transport) or
/// `InvalidResponseFormat` (unparsable model output). Never retries.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<Summary>;
}
