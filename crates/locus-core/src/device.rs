//! Device — a registered tracked entity.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, server-generated device identifier.
///
/// Clients only ever echo identifiers back; any string is accepted as a
/// lookup key so that unknown identifiers fall through to the unauthorized
/// path rather than failing validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
  /// Generate a fresh identifier from a random v4 UUID.
  pub fn generate() -> Self { Self(Uuid::new_v4().hyphenated().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<String> for DeviceId {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for DeviceId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl fmt::Display for DeviceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// A registry entry. Created once at registration and never mutated.
#[derive(Clone)]
pub struct Device {
  pub device_id:     DeviceId,
  /// Stored form of the passkey, as produced by
  /// [`PasskeyScheme::seal`](crate::credential::PasskeyScheme::seal).
  pub credential:    String,
  pub registered_at: DateTime<Utc>,
}

impl fmt::Debug for Device {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Device")
      .field("device_id", &self.device_id)
      .field("credential", &"<redacted>")
      .field("registered_at", &self.registered_at)
      .finish()
  }
}
