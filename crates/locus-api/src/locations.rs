//! Handlers for `/locations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/locations` | Body: [`SubmitBody`]; returns `success` |
//! | `POST` | `/locations/query` | Body: [`CredentialsBody`]; returns [`LocationList`] |
//!
//! Both answer `401` with the same body whether the device is unknown or the
//! passkey is wrong.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use locus_core::{
  device::DeviceId,
  reading::{DeviceCredentials, LocationReading, Submission},
  service::Tracker,
  store::TrackerStore,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extract::JsonBody};

/// Plain-text body returned by a successful submission.
pub const SUCCESS: &str = "success";

// ─── Submit ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  #[serde(rename = "deviceID")]
  pub device_id: DeviceId,
  pub passkey:   String,
  pub longitude: f64,
  pub latitude:  f64,
  pub timestamp: i64,
}

impl From<SubmitBody> for Submission {
  fn from(b: SubmitBody) -> Self {
    Submission {
      credentials: DeviceCredentials::new(b.device_id, b.passkey),
      longitude:   b.longitude,
      latitude:    b.latitude,
      timestamp:   b.timestamp,
    }
  }
}

/// `POST /locations`
pub async fn submit<S>(
  State(tracker): State<Tracker<S>>,
  JsonBody(body): JsonBody<SubmitBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  tracker.submit(body.into()).await?;
  Ok((StatusCode::OK, SUCCESS))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
  #[serde(rename = "deviceID")]
  pub device_id: DeviceId,
  pub passkey:   String,
}

/// One reading as shown to clients; the device is implied by the request.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LocationView {
  pub longitude: f64,
  pub latitude:  f64,
  pub timestamp: i64,
}

impl From<LocationReading> for LocationView {
  fn from(r: LocationReading) -> Self {
    Self { longitude: r.longitude, latitude: r.latitude, timestamp: r.timestamp }
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationList {
  pub locations: Vec<LocationView>,
}

/// `POST /locations/query`
pub async fn list<S>(
  State(tracker): State<Tracker<S>>,
  JsonBody(body): JsonBody<CredentialsBody>,
) -> Result<Json<LocationList>, ApiError>
where
  S: TrackerStore,
{
  let credentials = DeviceCredentials::new(body.device_id, body.passkey);
  let readings    = tracker.list(&credentials).await?;
  Ok(Json(LocationList {
    locations: readings.into_iter().map(LocationView::from).collect(),
  }))
}
