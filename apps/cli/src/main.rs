//! Biosearch CLI: serve, index and inspect the research document catalog.
//!
//! The catalog lists papers by title and link; entries gain a generated
//! description, tags, authors and document type on first access.

mod commands;
mod progress;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    // A missing .env is normal; the credential may come from the shell.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
