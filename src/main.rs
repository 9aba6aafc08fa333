//! geocomplete - geocoder autocomplete demo
//!
//! Command-line usage:
//!   geocomplete                     - Interactive page: search box, dropdown and map
//!   geocomplete --query "<text>"    - One-shot lookup printed as JSON
//!
//! The access token is read from `--access-token` or `MAPBOX_ACCESS_TOKEN`.

use anyhow::{Context, Result};
use clap::Parser;
use geocomplete::cli::{run_cli, Cli};
use std::fs::File;

/// Logs go to `--log-file` when given. The interactive page owns the terminal, so
/// without a file it only logs when `RUST_LOG` asks for it.
fn init_logging(cli: &Cli) -> Result<()> {
    let default_level = if cli.log_file.is_some() {
        "info"
    } else if cli.query.is_some() {
        "warn"
    } else {
        "off"
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("failed to initialise logger")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    log::info!("Starting geocomplete {}", env!("CARGO_PKG_VERSION"));
    run_cli(cli).await
}
