//! Enrichment pipeline and batch indexing for the document catalog.
//!
//! This crate ties together the catalog store, content fetcher and summarizer:
//! - [`pipeline`]: `ensure_enriched` for a single title
//! - [`locks`]: per-title single-writer locks
//! - [`indexer`]: sequential, paced re-indexing of all unenriched titles

pub mod indexer;
pub mod locks;
pub mod pipeline;

pub use indexer::{
    EntryEnricher, HttpEnricher, IndexProgress, IndexReport, SilentIndexProgress, reindex_all,
};
pub use locks::TitleLocks;
pub use pipeline::Enricher;
