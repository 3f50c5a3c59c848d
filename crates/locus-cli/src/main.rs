//! `locus` — command-line client for the Locus tracking API.
//!
//! # Usage
//!
//! ```text
//! locus register --passkey abc123
//! locus submit --device <ID> --passkey abc123 --longitude=-122.4 --latitude 37.8
//! locus list --device <ID> --passkey abc123
//! ```

mod client;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use client::{ApiClient, Location};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "locus", about = "Client for the Locus device-location API")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the Locus server (default: http://localhost:8080).
  #[arg(long, env = "LOCUS_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Register a new device and print its identifier.
  Register {
    #[arg(long, env = "LOCUS_PASSKEY")]
    passkey: String,
  },
  /// Submit one location reading.
  Submit {
    #[arg(long, env = "LOCUS_DEVICE")]
    device:    String,
    #[arg(long, env = "LOCUS_PASSKEY")]
    passkey:   String,
    #[arg(long, allow_negative_numbers = true)]
    longitude: f64,
    #[arg(long, allow_negative_numbers = true)]
    latitude:  f64,
    /// Epoch seconds; defaults to now.
    #[arg(long)]
    timestamp: Option<i64>,
  },
  /// List every reading for a device.
  List {
    #[arg(long, env = "LOCUS_DEVICE")]
    device:  String,
    #[arg(long, env = "LOCUS_PASSKEY")]
    passkey: String,
    /// Print raw JSON instead of a table.
    #[arg(long)]
    json:    bool,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flag overrides config file, which overrides the default.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string());
  tracing::debug!(%base_url, "using server");

  let client = ApiClient::new(base_url)?;

  match args.command {
    Command::Register { passkey } => {
      let device_id = client.register(&passkey).await?;
      println!("{device_id}");
    }
    Command::Submit { device, passkey, longitude, latitude, timestamp } => {
      let location = Location {
        longitude,
        latitude,
        timestamp: timestamp.unwrap_or_else(|| Utc::now().timestamp()),
      };
      client.submit(&device, &passkey, &location).await?;
      println!("success");
    }
    Command::List { device, passkey, json } => {
      let locations = client.list(&device, &passkey).await?;
      if json {
        println!("{}", serde_json_string(&locations)?);
      } else {
        print_table(&locations);
      }
    }
  }

  Ok(())
}

fn serde_json_string(locations: &[Location]) -> Result<String> {
  serde_json::to_string_pretty(&serde_json::json!({ "locations": locations }))
    .context("serialising locations")
}

fn print_table(locations: &[Location]) {
  if locations.is_empty() {
    println!("no readings");
    return;
  }
  println!("{:<25} {:>12} {:>12}", "time", "latitude", "longitude");
  for loc in locations {
    println!(
      "{:<25} {:>12.6} {:>12.6}",
      format_timestamp(loc.timestamp),
      loc.latitude,
      loc.longitude
    );
  }
}

/// Render epoch seconds as RFC 3339, falling back to the raw number when
/// out of range.
fn format_timestamp(ts: i64) -> String {
  DateTime::<Utc>::from_timestamp(ts, 0)
    .map(|dt| dt.to_rfc3339())
    .unwrap_or_else(|| ts.to_string())
}
