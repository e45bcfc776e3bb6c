use std::{io, path::PathBuf, sync::Arc};

use admin_core::{AdminConsole, DurableTokenStore, HttpCatalogApi};
use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod repl;

use config::{load_settings, Overrides};
use repl::Repl;

#[derive(Parser, Debug)]
#[command(name = "catalog-console", about = "Product catalog admin console")]
struct Args {
    /// Flat TOML file with api_base, api_path, database_url, token_entry
    #[arg(long, default_value = "console.toml")]
    config: PathBuf,
    #[arg(long)]
    api_base: Option<String>,
    #[arg(long)]
    api_path: Option<String>,
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long)]
    token_entry: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let settings = load_settings(
        &args.config,
        &Overrides {
            api_base: args.api_base,
            api_path: args.api_path,
            database_url: args.database_url,
            token_entry: args.token_entry,
        },
    )?;
    info!(
        api_base = %settings.api_base,
        api_path = %settings.api_path,
        "console: starting"
    );

    let tokens = DurableTokenStore::open(&settings.database_url, &settings.token_entry)
        .await
        .map_err(|error| {
            error!(
                database_url = %settings.database_url,
                %error,
                "failed to open token store; verify parent directory exists and permissions are correct"
            );
            error
        })?;
    let api = HttpCatalogApi::new(&settings.api_base, &settings.api_path);

    let mut console = AdminConsole::new(Arc::new(api), Arc::new(tokens));
    if console.start().await {
        info!("console: resumed persisted session");
    }

    let stdin = io::stdin();
    let mut repl = Repl::new(console, stdin.lock(), io::stdout());
    repl.run().await.context("console input/output failed")?;
    Ok(())
}
