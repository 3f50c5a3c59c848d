//! Server assembly for Locus.
//!
//! Loads [`ServerConfig`], opens the SQLite store under the configured table
//! names, and wraps the JSON API in request tracing.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use axum::Router;
use locus_core::{credential::PasskeyScheme, service::Tracker, store::TrackerStore};
use locus_store_sqlite::{SqliteStore, TableNames};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Store path that selects a throwaway in-memory database.
pub const IN_MEMORY: &str = ":memory:";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `LOCUS_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// Name of the device registry table.
  #[serde(default = "default_device_table")]
  pub device_table:   String,
  /// Name of the location log table.
  #[serde(default = "default_location_table")]
  pub location_table: String,
  #[serde(default)]
  pub passkey_scheme: PasskeyScheme,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("locus.db") }

fn default_device_table() -> String { "devices".to_string() }

fn default_location_table() -> String { "locations".to_string() }

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `LOCUS_*` environment
  /// variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("LOCUS"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn tables(&self) -> anyhow::Result<TableNames> {
    TableNames::new(&self.device_table, &self.location_table)
      .context("invalid table configuration")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Assembly ─────────────────────────────────────────────────────────────────

/// Open the store described by `cfg`.
pub async fn open_store(cfg: &ServerConfig) -> anyhow::Result<SqliteStore> {
  let tables = cfg.tables()?;

  if cfg.store_path.as_os_str() == IN_MEMORY {
    tracing::warn!("using an in-memory store; data is lost on exit");
    return SqliteStore::open_in_memory(tables)
      .await
      .context("failed to open in-memory store");
  }

  let store_path = expand_tilde(&cfg.store_path);
  SqliteStore::open(&store_path, tables)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))
}

/// The full HTTP application: API routes plus request tracing.
pub fn app<S>(tracker: Tracker<S>) -> Router
where
  S: TrackerStore + 'static,
{
  locus_api::api_router(tracker).layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Integration tests ────────────────────────────────────────────────────────
