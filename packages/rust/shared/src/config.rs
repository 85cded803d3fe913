//! Application configuration for biosearch.
//!
//! User config lives at `~/.biosearch/biosearch.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BiosearchError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "biosearch.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".biosearch";

// ---------------------------------------------------------------------------
// Config structs (matching biosearch.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog database and seed data.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// HTTP serving surface.
    #[serde(default)]
    pub server: ServerConfig,

    /// Page retrieval and extraction.
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Generative text service.
    #[serde(default)]
    pub summarizer: SummarizerConfig,

    /// Batch indexing driver.
    #[serde(default)]
    pub indexer: IndexerConfig,
}

/// `[database]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the catalog database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Directory of JSON seed files imported on `serve` and `import`.
    #[serde(default = "default_seed_dir")]
    pub seed_dir: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            seed_dir: default_seed_dir(),
        }
    }
}

fn default_db_path() -> String {
    "dataset.db".into()
}
fn default_seed_dir() -> String {
    "datasets".into()
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    8301
}

/// `[fetcher]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Browser-like User-Agent; some origins reject default client identifiers.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// CSS selector for the article body container.
    #[serde(default = "default_content_selector")]
    pub content_selector: String,

    /// Request timeout in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            content_selector: default_content_selector(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0".into()
}
fn default_content_selector() -> String {
    "#article-container".into()
}
fn default_fetch_timeout() -> u64 {
    30
}

/// `[summarizer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Gemini model ID.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generative language API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_summarizer_timeout")]
    pub timeout_secs: u64,

    /// Extracted text beyond this many characters is truncated before prompting.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_summarizer_timeout(),
            max_input_chars: default_max_input_chars(),
        }
    }
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_model() -> String {
    "gemini-2.5-flash-lite".into()
}
fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_summarizer_timeout() -> u64 {
    120
}
fn default_max_input_chars() -> usize {
    100_000
}

/// `[indexer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Base URL of the serving surface the driver calls.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Delay before each title, in milliseconds.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Per-title request timeout in seconds; covers a full fetch and summarize.
    #[serde(default = "default_indexer_timeout")]
    pub timeout_secs: u64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            pacing_ms: default_pacing_ms(),
            timeout_secs: default_indexer_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8301".into()
}
fn default_pacing_ms() -> u64 {
    500
}
fn default_indexer_timeout() -> u64 {
    300
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.biosearch/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BiosearchError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.biosearch/biosearch.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BiosearchError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        BiosearchError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BiosearchError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BiosearchError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BiosearchError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the summarizer API key from the environment.
///
/// Called at summarize time, not at start-up: a missing key only fails the
/// enrichment attempts that actually need it.
pub fn resolve_api_key(config: &SummarizerConfig) -> Result<String> {
    let var_name = &config.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(BiosearchError::missing_credential(var_name.clone())),
    }
}
