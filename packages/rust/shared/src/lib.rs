//! Shared types, error model, and configuration for biosearch.
//!
//! This crate is the foundation depended on by all other biosearch crates.
//! It provides:
//! - [`BiosearchError`]: the unified error type
//! - Domain types ([`DocumentEntry`], [`EntryView`], [`Summary`], [`SeedItem`])
//! - Configuration ([`AppConfig`] and its sections, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DatabaseConfig, FetcherConfig, IndexerConfig, ServerConfig, SummarizerConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from, resolve_api_key,
};
pub use error::{BiosearchError, Result};
pub use types::{DocumentEntry, EntryView, SeedItem, Summary};
