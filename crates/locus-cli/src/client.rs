//! Async HTTP client wrapping the Locus JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// One reading as returned by `POST /locations/query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
  pub longitude: f64,
  pub latitude:  f64,
  pub timestamp: i64,
}

#[derive(Deserialize)]
struct Registered {
  #[serde(rename = "deviceID")]
  device_id: String,
}

#[derive(Deserialize)]
struct LocationList {
  locations: Vec<Location>,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
  passkey: &'a str,
}

#[derive(Serialize)]
struct Credentials<'a> {
  #[serde(rename = "deviceID")]
  device_id: &'a str,
  passkey:   &'a str,
}

#[derive(Serialize)]
struct Submit<'a> {
  #[serde(rename = "deviceID")]
  device_id: &'a str,
  passkey:   &'a str,
  #[serde(flatten)]
  location:  &'a Location,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Async HTTP client for the Locus API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), path)
  }

  /// `POST /devices`
  pub async fn register(&self, passkey: &str) -> Result<String> {
    let resp = self
      .client
      .post(self.url("/devices"))
      .json(&RegisterBody { passkey })
      .send()
      .await
      .context("POST /devices failed")?;

    let resp = check(resp, "POST /devices").await?;
    let body: Registered = resp.json().await.context("deserialising device id")?;
    Ok(body.device_id)
  }

  /// `POST /locations`
  pub async fn submit(&self, device_id: &str, passkey: &str, location: &Location) -> Result<()> {
    let resp = self
      .client
      .post(self.url("/locations"))
      .json(&Submit { device_id, passkey, location })
      .send()
      .await
      .context("POST /locations failed")?;

    check(resp, "POST /locations").await?;
    Ok(())
  }

  /// `POST /locations/query`
  pub async fn list(&self, device_id: &str, passkey: &str) -> Result<Vec<Location>> {
    let resp = self
      .client
      .post(self.url("/locations/query"))
      .json(&Credentials { device_id, passkey })
      .send()
      .await
      .context("POST /locations/query failed")?;

    let resp = check(resp, "POST /locations/query").await?;
    let body: LocationList = resp.json().await.context("deserialising locations")?;
    Ok(body.locations)
  }
}

/// Turn a non-success response into an error carrying the server's message.
async fn check(resp: reqwest::Response, what: &str) -> Result<reqwest::Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  if status == StatusCode::UNAUTHORIZED {
    bail!("{what} → unauthorized (unknown device or wrong passkey)");
  }
  let message = resp
    .json::<ErrorBody>()
    .await
    .map(|b| b.error)
    .unwrap_or_default();
  Err(anyhow!("{what} → {status}: {message}"))
}
