//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use biosearch_core::{Enricher, HttpEnricher, reindex_all};
use biosearch_server::AppState;
use biosearch_shared::{AppConfig, init_config, load_config, load_config_from};
use biosearch_storage::{Storage, import_seed_dir};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};

use crate::progress::CliIndexProgress;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Biosearch: a lazily enriched catalog of research papers.
#[derive(Parser)]
#[command(
    name = "biosearch",
    version,
    about = "Serve and index a catalog of research papers with generated summaries.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.biosearch/biosearch.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Import seed files and start the HTTP server.
    Serve {
        /// Bind address (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides config).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Enrich every unindexed title, one at a time.
    Index {
        /// Run the pipeline in this process instead of calling a running server.
        #[arg(long)]
        in_process: bool,

        /// Delay before each title in milliseconds (overrides config).
        #[arg(long)]
        pacing_ms: Option<u64>,
    },

    /// Import seed JSON files into the catalog.
    Import {
        /// Seed directory (defaults to the configured seed_dir).
        dir: Option<PathBuf>,
    },

    /// Print every catalog title.
    Titles,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "biosearch=info",
        1 => "biosearch=debug",
        _ => "biosearch=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    if let Command::Config { action } = &cli.command {
        return match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config.as_deref()),
        };
    }

    let config = resolve_config(cli.config.as_deref())?;
    match cli.command {
        Command::Serve { host, port } => cmd_serve(&config, host, port).await,
        Command::Index {
            in_process,
            pacing_ms,
        } => cmd_index(&config, in_process, pacing_ms).await,
        Command::Import { dir } => cmd_import(&config, dir).await,
        Command::Titles => cmd_titles(&config).await,
        Command::Config { .. } => Ok(()),
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_serve(config: &AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let storage = Storage::open(Path::new(&config.database.path))
        .await
        .wrap_err("opening catalog database")?;

    let seed_dir = Path::new(&config.database.seed_dir);
    if seed_dir.is_dir() {
        let stats = import_seed_dir(&storage, seed_dir).await?;
        info!(
            files = stats.files,
            inserted = stats.inserted,
            "seed import finished"
        );
    } else {
        warn!(dir = %seed_dir.display(), "seed directory not found, serving existing catalog");
    }

    let enricher = Enricher::from_config(Arc::new(storage), config)?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    biosearch_server::serve(AppState::new(Arc::new(enricher)), &host, port).await?;
    Ok(())
}

async fn cmd_index(config: &AppConfig, in_process: bool, pacing_ms: Option<u64>) -> Result<()> {
    let pacing = Duration::from_millis(pacing_ms.unwrap_or(config.indexer.pacing_ms));
    let progress = CliIndexProgress::new();

    let report = if in_process {
        let storage = Arc::new(Storage::open(Path::new(&config.database.path)).await?);
        let enricher = Enricher::from_config(storage.clone(), config)?;
        info!(pacing_ms = pacing.as_millis() as u64, "indexing in-process");
        reindex_all(&storage, &enricher, pacing, &progress).await?
    } else {
        let storage = Storage::open_readonly(Path::new(&config.database.path))
            .await
            .wrap_err("opening catalog database")?;
        let enricher = HttpEnricher::from_config(&config.indexer)?;
        info!(base_url = %config.indexer.base_url, "indexing through server");
        reindex_all(&storage, &enricher, pacing, &progress).await?
    };

    if !report.failed.is_empty() {
        warn!(failed = report.failed.len(), "some titles were not indexed");
    }
    Ok(())
}

async fn cmd_import(config: &AppConfig, dir: Option<PathBuf>) -> Result<()> {
    let dir = dir.unwrap_or_else(|| PathBuf::from(&config.database.seed_dir));
    let storage = Storage::open(Path::new(&config.database.path)).await?;
    let stats = import_seed_dir(&storage, &dir)
        .await
        .wrap_err_with(|| format!("importing {}", dir.display()))?;

    println!();
    println!("  Seed import finished");
    println!("  Files:    {}", stats.files);
    println!("  Items:    {}", stats.items);
    println!("  Inserted: {}", stats.inserted);
    println!("  Invalid:  {}", stats.invalid);
    println!("  Total:    {}", storage.count().await?);
    println!();
    Ok(())
}

async fn cmd_titles(config: &AppConfig) -> Result<()> {
    let storage = Storage::open_readonly(Path::new(&config.database.path)).await?;
    for title in storage.list_titles().await? {
        println!("{title}");
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
