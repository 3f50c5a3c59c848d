//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Device identifiers are stored
//! verbatim.

use chrono::{DateTime, Utc};
use locus_core::device::{Device, DeviceId};

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// A `devices` row as read from SQLite, before timestamp decoding.
pub struct RawDevice {
  pub device_id:     String,
  pub credential:    String,
  pub registered_at: String,
}

impl RawDevice {
  pub fn into_device(self) -> Result<Device> {
    Ok(Device {
      device_id:     DeviceId::from(self.device_id),
      credential:    self.credential,
      registered_at: decode_dt(&self.registered_at)?,
    })
  }
}
