//! [`SqliteStore`] — the SQLite implementation of [`TrackerStore`].

use std::{path::Path, sync::Arc};

use rusqlite::OptionalExtension as _;

use locus_core::{
  device::{Device, DeviceId},
  reading::LocationReading,
  store::TrackerStore,
};

use crate::{
  Error, Result,
  encode::{RawDevice, encode_dt},
  schema::TableNames,
};

// ─── Statements ──────────────────────────────────────────────────────────────

/// SQL rendered once against the configured table names.
struct Statements {
  insert_device:   String,
  select_device:   String,
  insert_reading:  String,
  select_readings: String,
}

impl Statements {
  fn new(tables: &TableNames) -> Self {
    let devices   = tables.devices();
    let locations = tables.locations();
    Self {
      insert_device:   format!(
        "INSERT INTO {devices} (device_id, credential, registered_at) VALUES (?1, ?2, ?3)"
      ),
      select_device:   format!(
        "SELECT device_id, credential, registered_at FROM {devices} WHERE device_id = ?1"
      ),
      insert_reading:  format!(
        "INSERT INTO {locations} (device_id, longitude, latitude, timestamp)
         VALUES (?1, ?2, ?3, ?4)"
      ),
      select_readings: format!(
        "SELECT device_id, longitude, latitude, timestamp FROM {locations}
         WHERE device_id = ?1
         ORDER BY seq"
      ),
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Locus registry and location log backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  tables: TableNames,
  sql:    Arc<Statements>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, tables: TableNames) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, tables).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(tables: TableNames) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, tables).await
  }

  pub fn tables(&self) -> &TableNames { &self.tables }

  async fn init(conn: tokio_rusqlite::Connection, tables: TableNames) -> Result<Self> {
    let schema = tables.schema();
    conn
      .call(move |conn| {
        conn.execute_batch(&schema)?;
        Ok(())
      })
      .await?;

    let sql = Arc::new(Statements::new(&tables));
    Ok(Self { conn, tables, sql })
  }
}

// ─── TrackerStore impl ───────────────────────────────────────────────────────

impl TrackerStore for SqliteStore {
  type Error = Error;

  // ── Device registry ───────────────────────────────────────────────────────

  async fn put_device(&self, device: Device) -> Result<()> {
    let sql           = Arc::clone(&self.sql);
    let id_str        = device.device_id.as_str().to_owned();
    let credential    = device.credential;
    let registered_at = encode_dt(device.registered_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &sql.insert_device,
          rusqlite::params![id_str, credential, registered_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_device(&self, id: &DeviceId) -> Result<Option<Device>> {
    let sql    = Arc::clone(&self.sql);
    let id_str = id.as_str().to_owned();

    let raw: Option<RawDevice> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql.select_device, rusqlite::params![id_str], |row| {
            Ok(RawDevice {
              device_id:     row.get(0)?,
              credential:    row.get(1)?,
              registered_at: row.get(2)?,
            })
          })
          .optional()?)
      })
      .await?;

    raw.map(RawDevice::into_device).transpose()
  }

  // ── Location log — append-only ────────────────────────────────────────────

  async fn append_reading(&self, reading: LocationReading) -> Result<()> {
    let sql    = Arc::clone(&self.sql);
    let id_str = reading.device_id.as_str().to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &sql.insert_reading,
          rusqlite::params![id_str, reading.longitude, reading.latitude, reading.timestamp],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn scan_readings(&self, id: &DeviceId) -> Result<Vec<LocationReading>> {
    let sql    = Arc::clone(&self.sql);
    let id_str = id.as_str().to_owned();

    let readings = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql.select_readings)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(LocationReading {
              device_id: DeviceId::from(row.get::<_, String>(0)?),
              longitude: row.get(1)?,
              latitude:  row.get(2)?,
              timestamp: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(readings)
  }
}
