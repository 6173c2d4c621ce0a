//! markstack command-line client
//!
//! Usage:
//!   markstack --endpoint http://localhost:4000/graphql folder 1
//!   markstack add 1 https://www.rust-lang.org
//!
//! Connection settings come from `--config`, then `MARKSTACK_*` variables,
//! then flags.

use anyhow::{Context, Result};
use clap::Parser;
use markstack_cache::EntityCache;
use markstack_cli::{load_config, run, Cli};
use markstack_client::{BookmarkClient, HttpTransport};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config(&cli)?;
    info!(endpoint = %config.endpoint, "using backend");
    let transport = HttpTransport::new(config).context("failed to set up HTTP transport")?;
    let client = BookmarkClient::new(Arc::new(transport), Arc::new(EntityCache::new()));

    let mut stdout = std::io::stdout().lock();
    run(&client, cli.command, &mut stdout).await
}
