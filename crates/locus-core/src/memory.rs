//! [`MemoryStore`] — a process-local [`TrackerStore`] for tests and demos.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
  device::{Device, DeviceId},
  reading::LocationReading,
  store::TrackerStore,
};

/// An in-memory registry and log.
///
/// Cloning is cheap and clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
  devices:  HashMap<DeviceId, Device>,
  readings: Vec<LocationReading>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Total number of readings across all devices.
  pub fn reading_count(&self) -> usize { self.lock().readings.len() }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl TrackerStore for MemoryStore {
  type Error = Infallible;

  async fn put_device(&self, device: Device) -> Result<(), Infallible> {
    self.lock().devices.insert(device.device_id.clone(), device);
    Ok(())
  }

  async fn get_device(&self, id: &DeviceId) -> Result<Option<Device>, Infallible> {
    Ok(self.lock().devices.get(id).cloned())
  }

  async fn append_reading(&self, reading: LocationReading) -> Result<(), Infallible> {
    self.lock().readings.push(reading);
    Ok(())
  }

  async fn scan_readings(&self, id: &DeviceId) -> Result<Vec<LocationReading>, Infallible> {
    Ok(
      self
        .lock()
        .readings
        .iter()
        .filter(|r| &r.device_id == id)
        .cloned()
        .collect(),
    )
  }
}
