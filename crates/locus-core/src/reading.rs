//! Location readings and the inputs that produce them.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, device::DeviceId};

/// One entry in the location log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationReading {
  pub device_id: DeviceId,
  pub longitude: f64,
  pub latitude:  f64,
  /// Client-supplied epoch-like timestamp; monotonicity is not enforced.
  pub timestamp: i64,
}

/// The identifier/passkey pair presented on every gated request.
#[derive(Debug, Clone)]
pub struct DeviceCredentials {
  pub device_id: DeviceId,
  pub passkey:   String,
}

impl DeviceCredentials {
  pub fn new(device_id: impl Into<DeviceId>, passkey: impl Into<String>) -> Self {
    Self { device_id: device_id.into(), passkey: passkey.into() }
  }

  pub(crate) fn validate(&self) -> Result<()> {
    if self.device_id.is_empty() {
      return Err(Error::Validation("deviceID must not be empty".into()));
    }
    if self.passkey.is_empty() {
      return Err(Error::Validation("passkey must not be empty".into()));
    }
    Ok(())
  }
}

/// A location submission as received from a client.
#[derive(Debug, Clone)]
pub struct Submission {
  pub credentials: DeviceCredentials,
  pub longitude:   f64,
  pub latitude:    f64,
  pub timestamp:   i64,
}

impl Submission {
  pub(crate) fn validate(&self) -> Result<()> {
    self.credentials.validate()?;
    if !self.longitude.is_finite() {
      return Err(Error::Validation("longitude must be a finite number".into()));
    }
    if !self.latitude.is_finite() {
      return Err(Error::Validation("latitude must be a finite number".into()));
    }
    if self.timestamp < 0 {
      return Err(Error::Validation("timestamp must be non-negative".into()));
    }
    Ok(())
  }

  /// Build the log entry for this submission.
  pub(crate) fn into_reading(self) -> LocationReading {
    LocationReading {
      device_id: self.credentials.device_id,
      longitude: self.longitude,
      latitude:  self.latitude,
      timestamp: self.timestamp,
    }
  }
}
