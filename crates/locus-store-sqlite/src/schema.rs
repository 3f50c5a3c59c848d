//! SQL schema for the Locus SQLite store.
//!
//! Table names come from configuration, so the DDL is rendered at startup.
//! Names are restricted to plain identifiers before they reach any SQL.

use crate::{Error, Result};

/// Names of the device registry and location log tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
  devices:   String,
  locations: String,
}

impl TableNames {
  pub fn new(devices: impl Into<String>, locations: impl Into<String>) -> Result<Self> {
    let devices   = devices.into();
    let locations = locations.into();
    check_identifier(&devices)?;
    check_identifier(&locations)?;
    if devices.eq_ignore_ascii_case(&locations) {
      return Err(Error::SharedTableName(devices));
    }
    Ok(Self { devices, locations })
  }

  pub fn devices(&self) -> &str { &self.devices }

  pub fn locations(&self) -> &str { &self.locations }

  /// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
  pub(crate) fn schema(&self) -> String {
    let devices   = &self.devices;
    let locations = &self.locations;
    format!(
      "
PRAGMA journal_mode = WAL;

-- Written once per registration, never updated.
CREATE TABLE IF NOT EXISTS {devices} (
    device_id     TEXT PRIMARY KEY,
    credential    TEXT NOT NULL,   -- sealed passkey
    registered_at TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

-- Readings are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
-- device_id is deliberately not a foreign key.
CREATE TABLE IF NOT EXISTS {locations} (
    seq       INTEGER PRIMARY KEY AUTOINCREMENT,
    device_id TEXT    NOT NULL,
    longitude REAL    NOT NULL,
    latitude  REAL    NOT NULL,
    timestamp INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS {locations}_device_idx ON {locations}(device_id, seq);

PRAGMA user_version = 1;
"
    )
  }
}

fn check_identifier(name: &str) -> Result<()> {
  let mut chars = name.chars();
  let valid = chars
    .next()
    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
  if valid {
    Ok(())
  } else {
    Err(Error::InvalidTableName(name.to_owned()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_plain_identifiers() {
    let names = TableNames::new("devices", "location_log_2").unwrap();
    assert_eq!(names.devices(), "devices");
    assert_eq!(names.locations(), "location_log_2");
  }

  #[test]
  fn rejects_non_identifiers() {
    for bad in ["", "1devices", "devices; DROP TABLE x", "dev-ices", "dévices"] {
      assert!(
        matches!(TableNames::new(bad, "locations"), Err(Error::InvalidTableName(_))),
        "accepted {bad:?}"
      );
    }
  }

  #[test]
  fn rejects_shared_name() {
    assert!(matches!(
      TableNames::new("log", "LOG"),
      Err(Error::SharedTableName(_))
    ));
  }

  #[test]
  fn schema_uses_configured_names() {
    let ddl = TableNames::new("dev_t", "loc_t").unwrap().schema();
    assert!(ddl.contains("CREATE TABLE IF NOT EXISTS dev_t"));
    assert!(ddl.contains("CREATE TABLE IF NOT EXISTS loc_t"));
    assert!(ddl.contains("loc_t_device_idx ON loc_t"));
  }
}
