//! Standalone batch driver: enrich every unindexed title through the server.
//!
//! Takes no arguments. Settings come from `~/.biosearch/biosearch.toml`,
//! `.env` and `RUST_LOG`. Individual failures are printed and skipped; only
//! start-up problems produce a non-zero exit.

use std::path::Path;
use std::time::Duration;

use biosearch_core::{HttpEnricher, IndexProgress, IndexReport, reindex_all};
use biosearch_shared::{BiosearchError, load_config};
use biosearch_storage::Storage;
use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, fmt};

/// Plain line-per-title output.
struct LineProgress;

impl IndexProgress for LineProgress {
    fn started(&self, total: usize) {
        println!("Found {total} unindexed titles.");
    }

    fn indexed(&self, title: &str) {
        println!("Indexed: {title}");
    }

    fn failed(&self, title: &str, error: &BiosearchError) {
        println!("Error indexing {title}: {error}");
    }

    fn finished(&self, report: &IndexReport) {
        println!(
            "Indexing complete. {} succeeded, {} failed, {} total.",
            report.succeeded,
            report.failed.len(),
            report.total
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("biosearch=warn"));
    fmt().with_env_filter(env_filter).with_target(false).init();

    let config = load_config()?;
    let storage = Storage::open_readonly(Path::new(&config.database.path))
        .await
        .wrap_err("opening catalog database")?;
    let enricher = HttpEnricher::from_config(&config.indexer)?;

    reindex_all(
        &storage,
        &enricher,
        Duration::from_millis(config.indexer.pacing_ms),
        &LineProgress,
    )
    .await?;
    Ok(())
}
