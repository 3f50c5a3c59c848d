//! Error type for `locus-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A configured table name is not a plain SQL identifier.
  #[error("invalid table name: {0:?}")]
  InvalidTableName(String),

  #[error("device and location tables must differ (both {0:?})")]
  SharedTableName(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
