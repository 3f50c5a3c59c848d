//! Handler for `POST /devices`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use locus_core::{device::DeviceId, service::Tracker, store::TrackerStore};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extract::JsonBody};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub passkey: String,
}

#[derive(Debug, Serialize)]
pub struct Registered {
  #[serde(rename = "deviceID")]
  pub device_id: DeviceId,
}

/// `POST /devices` — body: `{"passkey":"..."}`
pub async fn register<S>(
  State(tracker): State<Tracker<S>>,
  JsonBody(body): JsonBody<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let device_id = tracker.register(&body.passkey).await?;
  Ok((StatusCode::CREATED, Json(Registered { device_id })))
}
