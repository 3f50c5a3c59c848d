//! [`Tracker`] — the passkey-gated register/submit/list operations.
//!
//! Submissions are validated first. Every gated operation then verifies the
//! passkey against the registry before it touches the location log, and
//! nothing is written unless both checks pass.

use std::sync::Arc;

use chrono::Utc;

use crate::{
  Error, Result,
  credential::PasskeyScheme,
  device::{Device, DeviceId},
  reading::{DeviceCredentials, LocationReading, Submission},
  store::TrackerStore,
};

/// Tracker operations over an injected store.
///
/// Holds no mutable state of its own; all shared state lives in the store.
pub struct Tracker<S> {
  store:  Arc<S>,
  scheme: PasskeyScheme,
}

impl<S> Clone for Tracker<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), scheme: self.scheme }
  }
}

impl<S: TrackerStore> Tracker<S> {
  pub fn new(store: Arc<S>, scheme: PasskeyScheme) -> Self { Self { store, scheme } }

  pub fn store(&self) -> &S { &self.store }

  /// Register a new device gated by `passkey` and return its identifier.
  ///
  /// Passkeys need not be unique across devices; every call creates a new
  /// device.
  pub async fn register(&self, passkey: &str) -> Result<DeviceId> {
    if passkey.is_empty() {
      return Err(Error::Validation("passkey must not be empty".into()));
    }

    let device = Device {
      device_id:     DeviceId::generate(),
      credential:    self.scheme.seal(passkey)?,
      registered_at: Utc::now(),
    };
    let device_id = device.device_id.clone();

    self.store.put_device(device).await.map_err(Error::storage)?;

    tracing::debug!(%device_id, "registered device");
    Ok(device_id)
  }

  /// Check `credentials` against the registry.
  ///
  /// Returns [`Error::Unauthorized`] both when the device is unknown and when
  /// the passkey does not match. Both paths run one passkey verification.
  pub async fn verify(&self, credentials: &DeviceCredentials) -> Result<Device> {
    let device = self
      .store
      .get_device(&credentials.device_id)
      .await
      .map_err(Error::storage)?;

    match device {
      Some(d) if self.scheme.verify(&d.credential, &credentials.passkey) => Ok(d),
      Some(_) => {
        tracing::debug!(device_id = %credentials.device_id, "passkey mismatch");
        Err(Error::Unauthorized)
      }
      None => {
        self.scheme.verify_unknown(&credentials.passkey);
        tracing::debug!(device_id = %credentials.device_id, "unknown device");
        Err(Error::Unauthorized)
      }
    }
  }

  /// Validate and authorize `submission`, then append it to the location log.
  pub async fn submit(&self, submission: Submission) -> Result<LocationReading> {
    submission.validate()?;
    self.verify(&submission.credentials).await?;

    let reading = submission.into_reading();
    self
      .store
      .append_reading(reading.clone())
      .await
      .map_err(Error::storage)?;

    tracing::debug!(
      device_id = %reading.device_id,
      timestamp = reading.timestamp,
      "recorded location"
    );
    Ok(reading)
  }

  /// Return every reading for the device, in the store's insertion order.
  ///
  /// A device with no readings yields an empty vector. Empty credentials
  /// are simply unauthorized.
  pub async fn list(&self, credentials: &DeviceCredentials) -> Result<Vec<LocationReading>> {
    self.verify(credentials).await?;

    self
      .store
      .scan_readings(&credentials.device_id)
      .await
      .map_err(Error::storage)
  }
}
