//! The `TrackerStore` trait.
//!
//! Implemented by storage backends (e.g. `locus-store-sqlite`, or the
//! in-process [`MemoryStore`](crate::memory::MemoryStore)). The
//! [`Tracker`](crate::service::Tracker) depends on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::{
  device::{Device, DeviceId},
  reading::LocationReading,
};

/// Abstraction over the device registry and the location log.
///
/// Devices are written once and never updated. Readings are append-only.
/// The store never checks passkeys; that is the tracker's job.
pub trait TrackerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Device registry ───────────────────────────────────────────────────

  /// Persist a newly registered device.
  fn put_device(
    &self,
    device: Device,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a device by identifier. Returns `None` if it was never
  /// registered.
  fn get_device<'a>(
    &'a self,
    id: &'a DeviceId,
  ) -> impl Future<Output = Result<Option<Device>, Self::Error>> + Send + 'a;

  // ── Location log ──────────────────────────────────────────────────────

  /// Append one reading as a single insert.
  fn append_reading(
    &self,
    reading: LocationReading,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Return every reading tagged with `id`, in insertion order.
  fn scan_readings<'a>(
    &'a self,
    id: &'a DeviceId,
  ) -> impl Future<Output = Result<Vec<LocationReading>, Self::Error>> + Send + 'a;
}
