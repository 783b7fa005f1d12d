//! inkpost CLI - launcher for the tags/articles HTTP service
//!
//! Loads `.env`, sets up tracing, and dispatches to subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "inkpost",
    author,
    version,
    about = "Tags and articles over HTTP with cursor pagination",
    long_about = "Serve a JSON API for tags and articles. Lists are paged with opaque cursors \
                  and article pages carry their tags, resolved concurrently."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; values may come from the real environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
    }
    Ok(())
}
