//! locus-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `LOCUS_*` environment variables, opens the SQLite store, and serves the
//! JSON API over HTTP.
//!
//! ```text
//! LOCUS_DEVICE_TABLE=devices LOCUS_LOCATION_TABLE=locations locus-server
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use locus_core::service::Tracker;
use locus_server::{ServerConfig, open_store};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Locus device-location server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)?;
  tracing::info!(
    devices = %server_cfg.device_table,
    locations = %server_cfg.location_table,
    scheme = ?server_cfg.passkey_scheme,
    "loaded configuration"
  );

  let store   = open_store(&server_cfg).await?;
  let tracker = Tracker::new(Arc::new(store), server_cfg.passkey_scheme);
  let app     = locus_server::app(tracker);

  let address = server_cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
